use serde::{Deserialize, Serialize};

/// One grid orientation and how many segments snapped onto it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleBucket {
    pub angle_deg: f64,
    pub count: usize,
}

/// Buckets ordered by descending count, ties by ascending angle.
pub fn rank_buckets(mut buckets: Vec<AngleBucket>) -> Vec<AngleBucket> {
    buckets.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.angle_deg.total_cmp(&b.angle_deg))
    });
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_prefers_count_then_angle() {
        let ranked = rank_buckets(vec![
            AngleBucket { angle_deg: 90.0, count: 2 },
            AngleBucket { angle_deg: 0.0, count: 5 },
            AngleBucket { angle_deg: 45.0, count: 2 },
        ]);
        let angles: Vec<f64> = ranked.iter().map(|b| b.angle_deg).collect();
        assert_eq!(angles, vec![0.0, 45.0, 90.0]);
    }
}
