use std::fmt;
use std::str::FromStr;

use crate::frame::{Result, TableError, Value};

/// Aggregate operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    /// Sum of all numeric values
    Sum,
    /// Count of all rows
    Count,
    /// Average of numeric values
    Avg,
    /// Minimum value
    Min,
    /// Maximum value
    Max,
}

impl AggregateOp {
    /// Reduces `values` to a single [`Value`].
    ///
    /// `Count` accepts anything; the other operations fail on the first text
    /// value. Integer sums stay integral unless they overflow `i64`.
    ///
    /// # Example
    /// ```rust
    /// # use columnar_frame::{AggregateOp, Value};
    /// let values = [Value::Int(2), Value::Float(0.5)];
    /// assert_eq!(AggregateOp::Sum.apply(&values).unwrap(), Value::Float(2.5));
    /// assert_eq!(AggregateOp::Max.apply(&values).unwrap(), Value::Int(2));
    /// ```
    pub fn apply(self, values: &[Value]) -> Result<Value> {
        match self {
            AggregateOp::Count => Ok(Value::Int(values.len() as i64)),
            AggregateOp::Sum => self.sum(values),
            AggregateOp::Avg => {
                if values.is_empty() {
                    return Err(TableError::EmptyColumn(self));
                }
                let total = self.numbers(values)?.sum::<f64>();
                Ok(Value::Float(total / values.len() as f64))
            }
            AggregateOp::Min | AggregateOp::Max => self.extreme(values),
        }
    }

    fn sum(self, values: &[Value]) -> Result<Value> {
        let mut int_sum: i128 = 0;
        let mut float_sum = 0.0f64;
        let mut all_int = true;

        for value in values {
            match value {
                Value::Int(v) => {
                    int_sum += *v as i128;
                    float_sum += *v as f64;
                }
                Value::Float(v) => {
                    all_int = false;
                    float_sum += v;
                }
                Value::Text(_) => return Err(self.non_numeric(value)),
            }
        }

        match i64::try_from(int_sum) {
            Ok(v) if all_int => Ok(Value::Int(v)),
            _ => Ok(Value::Float(float_sum)),
        }
    }

    /// Floats order by `total_cmp`, so a positive NaN is the maximum no matter
    /// where it appears.
    fn extreme(self, values: &[Value]) -> Result<Value> {
        let mut best: Option<(&Value, f64)> = None;
        for value in values {
            let n = value.as_f64().ok_or_else(|| self.non_numeric(value))?;
            let replace = match best {
                None => true,
                Some((_, b)) if self == AggregateOp::Min => n.total_cmp(&b).is_lt(),
                Some((_, b)) => n.total_cmp(&b).is_gt(),
            };
            if replace {
                best = Some((value, n));
            }
        }

        best.map(|(v, _)| v.clone())
            .ok_or(TableError::EmptyColumn(self))
    }

    fn numbers<'a>(self, values: &'a [Value]) -> Result<impl Iterator<Item = f64> + 'a> {
        if let Some(bad) = values.iter().find(|v| !v.is_numeric()) {
            return Err(self.non_numeric(bad));
        }
        Ok(values.iter().filter_map(Value::as_f64))
    }

    fn non_numeric(self, value: &Value) -> TableError {
        TableError::NonNumeric {
            op: self,
            value: value.clone(),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Count => "count",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        })
    }
}

impl FromStr for AggregateOp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregateOp::Sum),
            "count" => Ok(AggregateOp::Count),
            "avg" | "mean" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            other => Err(format!("unknown aggregate: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_stays_integral() {
        let values = [Value::Int(10), Value::Int(20), Value::Int(30)];
        assert_eq!(AggregateOp::Sum.apply(&values).unwrap(), Value::Int(60));
        assert_eq!(AggregateOp::Sum.apply(&[]).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_sum_overflow_widens_to_float() {
        let values = [Value::Int(i64::MAX), Value::Int(1)];
        assert_eq!(
            AggregateOp::Sum.apply(&values).unwrap(),
            Value::Float(i64::MAX as f64 + 1.0)
        );
    }

    #[test]
    fn test_avg() {
        let values = [Value::Int(10), Value::Float(20.0), Value::Int(30)];
        assert_eq!(AggregateOp::Avg.apply(&values).unwrap(), Value::Float(20.0));
        assert!(matches!(
            AggregateOp::Avg.apply(&[]),
            Err(TableError::EmptyColumn(AggregateOp::Avg))
        ));
    }

    #[test]
    fn test_min_max_keep_original_value() {
        let values = [Value::Float(2.5), Value::Int(-1), Value::Int(7)];
        assert_eq!(AggregateOp::Min.apply(&values).unwrap(), Value::Int(-1));
        assert_eq!(AggregateOp::Max.apply(&values).unwrap(), Value::Int(7));
        assert!(AggregateOp::Max.apply(&[]).is_err());
    }

    #[test]
    fn test_min_max_nan_is_order_independent() {
        let forward = [Value::Float(f64::NAN), Value::Float(1.0)];
        let backward = [Value::Float(1.0), Value::Float(f64::NAN)];
        for values in [&forward, &backward] {
            assert_eq!(AggregateOp::Max.apply(values).unwrap(), Value::Float(f64::NAN));
            assert_eq!(AggregateOp::Min.apply(values).unwrap(), Value::Float(1.0));
        }
    }

    #[test]
    fn test_text_is_rejected_except_for_count() {
        let values = [Value::Int(1), Value::Text("x".into())];
        assert_eq!(AggregateOp::Count.apply(&values).unwrap(), Value::Int(2));
        for op in [AggregateOp::Sum, AggregateOp::Avg, AggregateOp::Min, AggregateOp::Max] {
            assert!(matches!(
                op.apply(&values),
                Err(TableError::NonNumeric { value: Value::Text(_), .. })
            ));
        }
    }

    #[test]
    fn test_parse_op_names() {
        assert_eq!("Mean".parse::<AggregateOp>().unwrap(), AggregateOp::Avg);
        assert_eq!("max".parse::<AggregateOp>().unwrap(), AggregateOp::Max);
        assert!("median".parse::<AggregateOp>().is_err());
    }
}
