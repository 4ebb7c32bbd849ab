use async_trait::async_trait;
use chrono::Duration;

use crate::query_hydrator::QueryHydrator;
use crate::types::{ReportPeriod, ReportQuery};

/// Fills a missing reporting period with the window of `days` ending at the
/// query's `as_of` date (inclusive).
pub struct PeriodQueryHydrator {
    pub days: i64,
}

impl PeriodQueryHydrator {
    pub fn new() -> Self {
        Self { days: 30 }
    }
}

impl Default for PeriodQueryHydrator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryHydrator<ReportQuery> for PeriodQueryHydrator {
    fn enable(&self, query: &ReportQuery) -> bool {
        query.period.is_none()
    }

    async fn hydrate(&self, query: &ReportQuery) -> Result<ReportQuery, String> {
        if self.days < 1 {
            return Err(format!("period length must be positive, got {}", self.days));
        }
        let start = query
            .as_of
            .checked_sub_signed(Duration::days(self.days - 1))
            .ok_or_else(|| format!("period start before {} is out of range", query.as_of))?;

        Ok(ReportQuery {
            period: Some(ReportPeriod {
                start,
                end: query.as_of,
            }),
            ..query.clone()
        })
    }

    fn update(&self, query: &mut ReportQuery, hydrated: ReportQuery) {
        query.period = hydrated.period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(period: Option<ReportPeriod>) -> ReportQuery {
        ReportQuery {
            request_id: "t".into(),
            as_of: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            period,
            kinds: None,
            min_impressions: 0,
        }
    }

    #[tokio::test]
    async fn fills_thirty_day_window() {
        let hydrator = PeriodQueryHydrator::new();
        let q = query(None);
        assert!(hydrator.enable(&q));

        let hydrated = hydrator.hydrate(&q).await.unwrap();
        let period = hydrated.period.unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(period.end, q.as_of);
    }

    #[test]
    fn disabled_when_period_given() {
        let period = ReportPeriod {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        };
        assert!(!PeriodQueryHydrator::new().enable(&query(Some(period))));
    }
}
