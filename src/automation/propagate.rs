// Copyright (c) 2024 Mike Tsao

use super::Sample;
use crate::chart::{AuxFields, ControlPoint};
use serde::{Deserialize, Serialize};

/// The flag written into field 0 of rows that the sampler invented.
pub const INTERIOR_FLAG: &str = "0";

/// A sample with the auxiliary fields it'll be written with.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedSample {
    #[allow(missing_docs)]
    pub sample: Sample,
    #[allow(missing_docs)]
    pub aux: AuxFields,
}

/// Decides which source row's auxiliary fields each sample carries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuxPolicy {
    /// The first sample gets the segment's first row, the last sample gets its
    /// last row, and everything between gets the first row with field 0 set
    /// to [INTERIOR_FLAG].
    #[default]
    Positional,
    /// Each sample gets the row of the first control point at or after it.
    FollowingPoint,
}
impl AuxPolicy {
    /// Annotates one segment's samples. `segment` must be nonempty.
    pub fn propagate(
        &self,
        samples: Vec<Sample>,
        segment: &[ControlPoint],
    ) -> Vec<AnnotatedSample> {
        let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
            return Vec::default();
        };
        match self {
            AuxPolicy::Positional => positional(samples, &first.aux, &last.aux),
            AuxPolicy::FollowingPoint => following_point(samples, segment),
        }
    }
}

/// The [AuxPolicy::Positional] rule. The rule looks only at a sample's index,
/// never at its value.
pub fn positional(
    samples: Vec<Sample>,
    first: &AuxFields,
    last: &AuxFields,
) -> Vec<AnnotatedSample> {
    let last_index = samples.len().saturating_sub(1);
    let interior = first.with_flag(INTERIOR_FLAG);
    samples
        .into_iter()
        .enumerate()
        .map(|(i, sample)| {
            let aux = if i == 0 {
                first.clone()
            } else if i == last_index {
                last.clone()
            } else {
                interior.clone()
            };
            AnnotatedSample { sample, aux }
        })
        .collect()
}

/// The [AuxPolicy::FollowingPoint] rule.
pub fn following_point(samples: Vec<Sample>, segment: &[ControlPoint]) -> Vec<AnnotatedSample> {
    samples
        .into_iter()
        .map(|sample| {
            let index = segment
                .partition_point(|p| p.tick < sample.tick)
                .min(segment.len() - 1);
            AnnotatedSample {
                sample,
                aux: segment[index].aux.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tick;

    fn samples(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample {
                tick: Tick(i * 3),
                value: i as f64,
            })
            .collect()
    }

    fn aux(fields: &[&str]) -> AuxFields {
        fields.iter().copied().collect()
    }

    #[test]
    fn positional_flags_interior_samples() {
        let first = aux(&["2", "B", "x"]);
        let last = aux(&["3", "D", "y"]);
        let rows = positional(samples(5), &first, &last);
        let flags: Vec<_> = rows.iter().map(|r| r.aux.0[0].as_str()).collect();
        assert_eq!(flags, vec!["2", "0", "0", "0", "3"]);
        assert_eq!(rows[0].aux, first);
        assert_eq!(rows[2].aux, aux(&["0", "B", "x"]));
        assert_eq!(rows[4].aux, last);
    }

    #[test]
    fn positional_handles_tiny_segments() {
        let first = aux(&["A"]);
        let last = aux(&["C"]);
        let rows = positional(samples(2), &first, &last);
        assert_eq!(rows[0].aux, first);
        assert_eq!(rows[1].aux, last);

        let rows = positional(samples(1), &first, &last);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].aux, first);

        assert!(positional(Vec::default(), &first, &last).is_empty());
    }

    #[test]
    fn following_point_takes_the_next_control_point() {
        let segment: Vec<ControlPoint> = [(0, "A"), (6, "B"), (12, "C")]
            .into_iter()
            .map(|(t, a)| ControlPoint {
                aux: aux(&[a]),
                ..ControlPoint::new_with(Tick(t), 0.0)
            })
            .collect();
        let rows = AuxPolicy::FollowingPoint.propagate(samples(5), &segment);
        let flags: Vec<_> = rows.iter().map(|r| r.aux.0[0].as_str()).collect();
        // Ticks 0, 3, 6, 9, 12.
        assert_eq!(flags, vec!["A", "B", "B", "C", "C"]);
    }

    #[test]
    fn policy_dispatches_to_positional_by_default() {
        let segment = vec![
            ControlPoint {
                aux: aux(&["A", "B"]),
                ..ControlPoint::new_with(Tick(0), 0.0)
            },
            ControlPoint {
                aux: aux(&["C", "D"]),
                ..ControlPoint::new_with(Tick(12), 1.0)
            },
        ];
        let rows = AuxPolicy::default().propagate(samples(5), &segment);
        assert_eq!(rows[1].aux, aux(&["0", "B"]));
        assert_eq!(rows[4].aux, aux(&["C", "D"]));
    }
}
