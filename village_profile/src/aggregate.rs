use std::error::Error;
use std::fmt::Display;

use log::warn;

use crate::config::SourceDescriptor;

/// How the retrieval results of all the sources are combined.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum AggregationPolicy {
    /// Any failing source fails the whole batch.
    #[default]
    AllOrNothing,
    /// Failing sources are reported and left out.
    PartialTolerant,
}

/// The failure to retrieve one source.
#[derive(Debug)]
pub struct SourceFailure<E> {
    pub source: SourceDescriptor,
    pub error: E,
}

impl<E: Display> Display for SourceFailure<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "source {}: {}", self.source.name, self.error)
    }
}

impl<E: Error + 'static> Error for SourceFailure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

#[derive(Debug)]
pub struct Aggregated<T, E> {
    /// The retrieved sources, in the order of the input.
    pub loaded: Vec<(SourceDescriptor, T)>,
    /// Only filled under the partial policy.
    pub failures: Vec<SourceFailure<E>>,
}

/// Folds the per-source results, given in declaration order.
///
/// With [AggregationPolicy::AllOrNothing], the first failure is returned.
///
/// ```
/// use village_profile::*;
///
/// let results: Vec<(SourceDescriptor, Result<&str, String>)> = vec![
///     (SourceDescriptor::new("Kampangar", "0"), Ok("a,b")),
///     (SourceDescriptor::new("Kuntang", "1"), Err("503".to_string())),
/// ];
/// let agg = aggregate(results, AggregationPolicy::PartialTolerant).unwrap();
/// assert_eq!(agg.loaded.len(), 1);
/// assert_eq!(agg.failures[0].source.name, "Kuntang");
/// ```
pub fn aggregate<T, E: Display>(
    results: Vec<(SourceDescriptor, Result<T, E>)>,
    policy: AggregationPolicy,
) -> Result<Aggregated<T, E>, SourceFailure<E>> {
    let mut loaded: Vec<(SourceDescriptor, T)> = Vec::new();
    let mut failures: Vec<SourceFailure<E>> = Vec::new();
    for (source, res) in results {
        match res {
            Ok(x) => loaded.push((source, x)),
            Err(error) => {
                let failure = SourceFailure { source, error };
                if policy == AggregationPolicy::AllOrNothing {
                    return Err(failure);
                }
                warn!("aggregate: skipping {}", failure);
                failures.push(failure);
            }
        }
    }
    Ok(Aggregated { loaded, failures })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<(SourceDescriptor, Result<u32, String>)> {
        vec![
            (SourceDescriptor::new("a", "0"), Ok(1)),
            (SourceDescriptor::new("b", "1"), Err("timeout".to_string())),
            (SourceDescriptor::new("c", "2"), Ok(3)),
            (SourceDescriptor::new("d", "3"), Err("404".to_string())),
        ]
    }

    #[test]
    fn all_or_nothing_returns_first_failure() {
        let err = aggregate(results(), AggregationPolicy::AllOrNothing).unwrap_err();
        assert_eq!(err.source.name, "b");
        assert_eq!(err.error, "timeout");
        assert_eq!(err.to_string(), "source b: timeout");
    }

    #[test]
    fn all_or_nothing_success() {
        let ok: Vec<(SourceDescriptor, Result<u32, String>)> = results()
            .into_iter()
            .filter(|(_, r)| r.is_ok())
            .collect();
        let agg = aggregate(ok, AggregationPolicy::default()).unwrap();
        let values: Vec<u32> = agg.loaded.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1, 3]);
        assert!(agg.failures.is_empty());
    }

    #[test]
    fn partial_keeps_order_and_failures() {
        let agg = aggregate(results(), AggregationPolicy::PartialTolerant).unwrap();
        let names: Vec<&str> = agg.loaded.iter().map(|(s, _)| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        let failed: Vec<&str> = agg
            .failures
            .iter()
            .map(|f| f.source.name.as_str())
            .collect();
        assert_eq!(failed, vec!["b", "d"]);
    }

    #[test]
    fn empty_batch() {
        let empty: Vec<(SourceDescriptor, Result<u32, String>)> = vec![];
        let agg = aggregate(empty, AggregationPolicy::AllOrNothing).unwrap();
        assert!(agg.loaded.is_empty());
    }
}
