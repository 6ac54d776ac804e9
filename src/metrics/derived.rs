use serde::{Deserialize, Serialize};

use super::RawMetrics;

/// Inputs the Graph API cannot provide yet. Ratios built on them always fall
/// through to the zero-denominator branch or evaluate against these stubs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderInputs {
    pub revenue: f64,
    pub new_customers: f64,
    pub max_bid: f64,
    pub daily_budget: f64,
    pub quality_ranking: f64,
    pub engagement_ranking: f64,
    pub conversion_ranking: f64,
    pub conversions_during_learning: f64,
    pub campaign_revenue: f64,
    pub baseline_revenue: f64,
    /// Average video duration in the same unit as `average_watch_time`.
    pub video_duration: f64,
}

impl Default for PlaceholderInputs {
    fn default() -> Self {
        Self {
            revenue: 0.0,
            new_customers: 0.0,
            max_bid: 1.0,
            daily_budget: 1.0,
            quality_ranking: 0.0,
            engagement_ranking: 0.0,
            conversion_ranking: 0.0,
            conversions_during_learning: 0.0,
            campaign_revenue: 0.0,
            baseline_revenue: 0.0,
            video_duration: 1.0,
        }
    }
}

/// Marketing ratios derived from [`RawMetrics`].
///
/// Percentages are scaled by 100, cost-per-mille by 1000, everything is
/// rounded to two decimals and a non-positive denominator yields `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub engagement_total: u64,
    pub engagement_rate: f64,
    pub frequency: f64,
    pub reach_rate: f64,
    pub impression_share: f64,
    pub total_available_impressions: u64,
    pub click_through_rate: f64,
    pub comment_rate: f64,
    pub share_rate: f64,
    pub amplification_rate: f64,
    pub applause_rate: f64,
    pub conversation_rate: f64,
    pub engagement_by_impressions: f64,
    pub conversion_rate: f64,
    pub cost_per_click: f64,
    pub cost_per_mille: f64,
    pub save_rate: f64,
    pub return_on_ad_spend: f64,
    pub revenue_per_click: f64,
    pub customer_acquisition_cost: f64,
    pub cost_per_acquisition: f64,
    pub bid_efficiency: f64,
    pub audience_saturation: f64,
    pub daily_budget_utilization: f64,
    pub optimization_score: f64,
    pub learning_efficiency: f64,
    #[serde(rename = "incrementalROAS")]
    pub incremental_roas: f64,
    pub video_completion_rate: f64,
    pub video_engagement_rate: f64,
    #[serde(rename = "videoCTR")]
    pub video_ctr: f64,
    pub average_percentage_viewed: f64,
}

impl DerivedMetrics {
    /// Compute every ratio from the raw counters.
    pub fn compute(raw: &RawMetrics, stubs: &PlaceholderInputs) -> Self {
        let engagement_total = raw.likes + raw.comments + raw.shares;
        let engagements = engagement_total as f64;

        let reach = raw.reach as f64;
        let impressions = raw.impressions as f64;
        let followers = raw.total_followers as f64;
        // No source for the market-wide figure; the page's own impressions stand in.
        let total_available_impressions = raw.impressions;
        let website_clicks = raw.website_clicks as f64;
        let link_clicks = raw.cta_clicks as f64;
        let conversions = raw.post_saves as f64;
        let video_views = raw.video_views as f64;

        let cost_per_click = ratio(raw.ad_spend, website_clicks, 1.0);

        Self {
            engagement_total,
            engagement_rate: ratio(engagements, reach, 100.0),
            frequency: ratio(impressions, reach, 1.0),
            reach_rate: ratio(reach, followers, 100.0),
            impression_share: ratio(impressions, total_available_impressions as f64, 100.0),
            total_available_impressions,
            click_through_rate: ratio(website_clicks, impressions, 100.0),
            comment_rate: ratio(raw.comments as f64, reach, 100.0),
            share_rate: ratio(raw.shares as f64, reach, 100.0),
            amplification_rate: ratio(raw.shares as f64, engagements, 100.0),
            applause_rate: ratio(raw.likes as f64, engagements, 100.0),
            conversation_rate: ratio(raw.comments as f64, engagements, 100.0),
            engagement_by_impressions: ratio(engagements, impressions, 100.0),
            conversion_rate: ratio(conversions, link_clicks, 100.0),
            cost_per_click,
            cost_per_mille: ratio(raw.ad_spend, impressions, 1000.0),
            save_rate: ratio(conversions, reach, 100.0),
            return_on_ad_spend: ratio(stubs.revenue, raw.ad_spend, 100.0),
            revenue_per_click: ratio(stubs.revenue, website_clicks, 1.0),
            customer_acquisition_cost: ratio(raw.ad_spend, stubs.new_customers, 1.0),
            cost_per_acquisition: ratio(raw.ad_spend, conversions, 1.0),
            bid_efficiency: ratio(cost_per_click, stubs.max_bid, 100.0),
            audience_saturation: ratio(reach, followers, 100.0),
            daily_budget_utilization: ratio(raw.ad_spend, stubs.daily_budget, 100.0),
            optimization_score: ratio(
                stubs.quality_ranking + stubs.engagement_ranking + stubs.conversion_ranking,
                3.0,
                1.0,
            ),
            learning_efficiency: ratio(stubs.conversions_during_learning, conversions, 100.0),
            incremental_roas: ratio(
                stubs.campaign_revenue - stubs.baseline_revenue,
                raw.ad_spend,
                1.0,
            ),
            video_completion_rate: ratio(raw.ten_second_views as f64, video_views, 100.0),
            video_engagement_rate: ratio(engagements, video_views, 100.0),
            video_ctr: ratio(website_clicks, impressions, 100.0),
            average_percentage_viewed: ratio(raw.average_watch_time, stubs.video_duration, 100.0),
        }
    }
}

/// `round2(numerator / denominator * scale)`, or `0` when the denominator is
/// not positive.
pub fn ratio(numerator: f64, denominator: f64, scale: f64) -> f64 {
    if denominator > 0.0 {
        round2(numerator / denominator * scale)
    } else {
        0.0
    }
}

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_raw() -> RawMetrics {
        RawMetrics {
            reach: 10000,
            likes: 300,
            comments: 50,
            shares: 20,
            ..RawMetrics::default()
        }
    }

    #[test]
    fn test_engagement_total_and_rate() {
        let derived = DerivedMetrics::compute(&sample_raw(), &PlaceholderInputs::default());
        assert_eq!(derived.engagement_total, 370);
        assert_eq!(derived.engagement_rate, 3.7);
    }

    #[test]
    fn test_zero_reach_gives_zero_rate() {
        let raw = RawMetrics {
            reach: 0,
            ..sample_raw()
        };
        let derived = DerivedMetrics::compute(&raw, &PlaceholderInputs::default());
        assert_eq!(derived.engagement_total, 370);
        assert_eq!(derived.engagement_rate, 0.0);
        assert_eq!(derived.comment_rate, 0.0);
        assert_eq!(derived.share_rate, 0.0);
        assert_eq!(derived.frequency, 0.0);
    }

    #[test]
    fn test_all_zero_inputs_are_finite_zeros() {
        let derived = DerivedMetrics::compute(&RawMetrics::default(), &PlaceholderInputs::default());
        let value = serde_json::to_value(&derived).unwrap();
        for (key, v) in value.as_object().unwrap() {
            let n = v.as_f64().unwrap();
            assert!(n.is_finite(), "{} is not finite", key);
            assert_eq!(n, 0.0, "{} should be zero", key);
        }
    }

    #[test]
    fn test_engagement_shares() {
        let derived = DerivedMetrics::compute(&sample_raw(), &PlaceholderInputs::default());
        assert_eq!(derived.applause_rate, 81.08);
        assert_eq!(derived.conversation_rate, 13.51);
        assert_eq!(derived.amplification_rate, 5.41);
        assert_eq!(derived.comment_rate, 0.5);
        assert_eq!(derived.share_rate, 0.2);
    }

    #[test]
    fn test_impression_and_follower_ratios() {
        let raw = RawMetrics {
            reach: 800,
            impressions: 1200,
            total_followers: 4000,
            ..sample_raw()
        };
        let derived = DerivedMetrics::compute(&raw, &PlaceholderInputs::default());
        assert_eq!(derived.frequency, 1.5);
        assert_eq!(derived.reach_rate, 20.0);
        assert_eq!(derived.audience_saturation, 20.0);
        assert_eq!(derived.impression_share, 100.0);
        assert_eq!(derived.total_available_impressions, 1200);
        assert_eq!(derived.engagement_by_impressions, 30.83);
    }

    #[test]
    fn test_video_ratios() {
        let raw = RawMetrics {
            video_views: 400,
            ten_second_views: 100,
            average_watch_time: 0.35,
            ..sample_raw()
        };
        let derived = DerivedMetrics::compute(&raw, &PlaceholderInputs::default());
        assert_eq!(derived.video_completion_rate, 25.0);
        assert_eq!(derived.video_engagement_rate, 92.5);
        assert_eq!(derived.average_percentage_viewed, 35.0);
    }

    #[test]
    fn test_stubbed_ad_metrics_stay_zero() {
        let raw = RawMetrics {
            impressions: 5000,
            ..sample_raw()
        };
        let derived = DerivedMetrics::compute(&raw, &PlaceholderInputs::default());
        assert_eq!(derived.cost_per_click, 0.0);
        assert_eq!(derived.cost_per_mille, 0.0);
        assert_eq!(derived.return_on_ad_spend, 0.0);
        assert_eq!(derived.customer_acquisition_cost, 0.0);
        assert_eq!(derived.bid_efficiency, 0.0);
        assert_eq!(derived.daily_budget_utilization, 0.0);
        assert_eq!(derived.optimization_score, 0.0);
        assert_eq!(derived.incremental_roas, 0.0);
    }

    #[test]
    fn test_ad_metrics_with_real_inputs() {
        let raw = RawMetrics {
            impressions: 20000,
            website_clicks: 50,
            ad_spend: 25.0,
            ..sample_raw()
        };
        let stubs = PlaceholderInputs {
            revenue: 100.0,
            max_bid: 2.0,
            daily_budget: 50.0,
            ..PlaceholderInputs::default()
        };
        let derived = DerivedMetrics::compute(&raw, &stubs);
        assert_eq!(derived.cost_per_click, 0.5);
        assert_eq!(derived.cost_per_mille, 1.25);
        assert_eq!(derived.click_through_rate, 0.25);
        assert_eq!(derived.return_on_ad_spend, 400.0);
        assert_eq!(derived.revenue_per_click, 2.0);
        assert_eq!(derived.bid_efficiency, 25.0);
        assert_eq!(derived.daily_budget_utilization, 50.0);
    }

    #[test]
    fn test_serialized_key_names() {
        let value = serde_json::to_value(DerivedMetrics::default()).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("incrementalROAS"));
        assert!(object.contains_key("videoCTR"));
        assert!(object.contains_key("costPerMille"));
        assert_eq!(object.len(), 31);
    }

    #[test]
    fn test_ratio_guard() {
        assert_eq!(ratio(5.0, 0.0, 100.0), 0.0);
        assert_eq!(ratio(5.0, -1.0, 100.0), 0.0);
        assert_eq!(ratio(1.0, 3.0, 100.0), 33.33);
        assert_eq!(round2(2.005_1), 2.01);
        assert_eq!(ratio(1.0, 800.0, 100.0), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_half_ties_round_to_even() {
        let raw = RawMetrics {
            reach: 800,
            comments: 1,
            ..RawMetrics::default()
        };
        let derived = DerivedMetrics::compute(&raw, &PlaceholderInputs::default());
        assert_eq!(derived.comment_rate, 0.12);
    }
}
