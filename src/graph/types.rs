use serde::Deserialize;

/// Paged list envelope (`{"data": [...]}`)
#[derive(Debug, Clone, Deserialize)]
pub struct GraphList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Object reference returned by `fields=id` listings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphNode {
    pub id: String,
}

/// Engagement edges of a single post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostEngagement {
    #[serde(default)]
    pub likes: Option<SummaryEdge>,
    #[serde(default)]
    pub comments: Option<SummaryEdge>,
    #[serde(default)]
    pub shares: Option<ShareCount>,
}

/// Edge requested with `.summary(true)`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryEdge {
    #[serde(default)]
    pub summary: Option<Summary>,
}

/// Summary block of an edge
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_count: u64,
}

/// Share counter of a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareCount {
    #[serde(default)]
    pub count: u64,
}

/// One named metric from an `/insights` response
#[derive(Debug, Clone, Deserialize)]
pub struct InsightMetric {
    pub name: String,
    #[serde(default)]
    pub values: Vec<InsightValue>,
}

/// A single period value of an insight metric
#[derive(Debug, Clone, Deserialize)]
pub struct InsightValue {
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Page node requested with `fields=followers_count`
#[derive(Debug, Clone, Deserialize)]
pub struct PageFollowers {
    #[serde(default)]
    pub followers_count: Option<u64>,
}

impl PostEngagement {
    /// Total likes, zero when the edge is absent.
    pub fn likes(&self) -> u64 {
        edge_total(self.likes.as_ref())
    }

    /// Total comments, zero when the edge is absent.
    pub fn comments(&self) -> u64 {
        edge_total(self.comments.as_ref())
    }

    /// Share count, zero when the post was never shared.
    pub fn shares(&self) -> u64 {
        self.shares.as_ref().map(|s| s.count).unwrap_or(0)
    }
}

fn edge_total(edge: Option<&SummaryEdge>) -> u64 {
    edge.and_then(|e| e.summary.as_ref())
        .map(|s| s.total_count)
        .unwrap_or(0)
}

impl InsightMetric {
    /// First period value as a number. Object-valued metrics (for example
    /// `video_retention` buckets) and missing values yield `None`.
    pub fn first_value(&self) -> Option<f64> {
        self.values.first().and_then(|v| v.value.as_f64())
    }
}
