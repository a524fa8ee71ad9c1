use crate::engine::ForecastResult;
use core_types::{ChartPoint, SalesRecord};

/// Attaches forecast values to the historical records by position.
///
/// Record `i` gets `predictions[i]` while `i` is inside the horizon; every
/// later record gets no prediction. The predictions are not appended as future
/// periods. Record order is preserved.
pub fn combine_with_history(records: Vec<SalesRecord>, forecast: &ForecastResult) -> Vec<ChartPoint> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| ChartPoint {
            record,
            prediction: forecast.get(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FORECAST_HORIZON, forecast};
    use serde_json::json;

    fn history(len: usize) -> Vec<SalesRecord> {
        (0..len)
            .map(|i| {
                SalesRecord::new("FR", "p42", 100.0)
                    .unwrap()
                    .with_attribute("month", json!(i + 1))
            })
            .collect()
    }

    #[test]
    fn test_short_history_gets_predictions_everywhere() {
        let records = history(3);
        let result = forecast(&records).unwrap();

        let points = combine_with_history(records, &result);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.prediction == Some(100.0)));
    }

    #[test]
    fn test_history_exactly_one_horizon_long() {
        let records = history(FORECAST_HORIZON);
        let result = forecast(&records).unwrap();

        let points = combine_with_history(records, &result);
        assert_eq!(points.len(), FORECAST_HORIZON);
        assert!(points.iter().all(|p| p.prediction == Some(100.0)));
    }

    #[test]
    fn test_records_past_the_horizon_get_none() {
        let records = history(8);
        let result = forecast(&records).unwrap();

        let points = combine_with_history(records, &result);
        assert_eq!(points.len(), 8);
        for (index, point) in points.iter().enumerate() {
            if index < FORECAST_HORIZON {
                assert_eq!(point.prediction, Some(100.0));
            } else {
                assert_eq!(point.prediction, None);
            }
        }
    }

    #[test]
    fn test_order_and_attributes_are_preserved() {
        let records = history(6);
        let result = forecast(&records).unwrap();

        let points = combine_with_history(records, &result);
        let months: Vec<_> = points.iter().map(|p| p.record.attributes["month"].clone()).collect();
        assert_eq!(months, (1..=6).map(|m| json!(m)).collect::<Vec<_>>());
    }
}
