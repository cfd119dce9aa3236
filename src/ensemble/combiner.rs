//! Pooling sample paths from several models into one ensemble.

use crate::core::{SamplePathSet, SamplePathStore};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// How much of the pooled ensemble one member contributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Share {
    /// Take exactly this many paths from the member.
    Replicates(usize),
    /// Relative weight; counts are apportioned from the pool size.
    Weight(f64),
}

/// A source path set and its share of the ensemble.
#[derive(Debug, Clone, Copy)]
pub struct EnsembleMember<'a> {
    pub paths: &'a SamplePathSet,
    pub share: Share,
}

impl<'a> EnsembleMember<'a> {
    /// Contribute every path of the set once.
    pub fn all(paths: &'a SamplePathSet) -> Self {
        Self {
            paths,
            share: Share::Replicates(paths.len()),
        }
    }

    pub fn replicates(paths: &'a SamplePathSet, count: usize) -> Self {
        Self {
            paths,
            share: Share::Replicates(count),
        }
    }

    pub fn weighted(paths: &'a SamplePathSet, weight: f64) -> Self {
        Self {
            paths,
            share: Share::Weight(weight),
        }
    }
}

/// Configuration for the ensemble combiner.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleConfig {
    /// Model name of the pooled set.
    pub name: String,
    /// Size of a weighted pool; defaults to the total number of input paths.
    pub pool_size: Option<usize>,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            name: "ensemble".to_string(),
            pool_size: None,
        }
    }
}

impl EnsembleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Fix the number of paths in a weighted pool.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = Some(pool_size);
        self
    }
}

/// Combines the sample paths of several models into one path set.
///
/// Members contribute paths in order: a member asked for `k` paths gives its
/// first `k` when it has enough and cycles through them again when it does
/// not. No randomness is involved, so combining is reproducible.
#[derive(Debug, Clone, Default)]
pub struct EnsembleCombiner {
    config: EnsembleConfig,
}

impl EnsembleCombiner {
    pub fn new(config: EnsembleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Concatenate every path of every set with equal standing.
    ///
    /// # Example
    /// ```
    /// use pathcast::core::SamplePathSet;
    /// use pathcast::ensemble::EnsembleCombiner;
    ///
    /// let ets = SamplePathSet::new("ETS", vec![vec![1.0, 2.0]; 3]).unwrap();
    /// let arima = SamplePathSet::new("ARIMA", vec![vec![2.0, 3.0]; 5]).unwrap();
    ///
    /// let pooled = EnsembleCombiner::default().pool(&[&ets, &arima]).unwrap();
    /// assert_eq!(pooled.len(), 8);
    /// assert_eq!(pooled.name(), "ensemble");
    /// ```
    pub fn pool(&self, sets: &[&SamplePathSet]) -> Result<SamplePathSet> {
        let members: Vec<_> = sets.iter().map(|s| EnsembleMember::all(s)).collect();
        self.combine(&members)
    }

    /// Combine members according to their shares.
    pub fn combine(&self, members: &[EnsembleMember<'_>]) -> Result<SamplePathSet> {
        let timestamps = check_members(members)?;
        let counts = self.allocation(members)?;

        tracing::debug!(
            ensemble = %self.config.name,
            members = members.len(),
            ?counts,
            "combining sample paths"
        );

        let total: usize = counts.iter().sum();
        let mut pooled = Vec::with_capacity(total);
        for (member, &count) in members.iter().zip(counts.iter()) {
            pooled.extend(draw(member.paths, count));
        }

        if pooled.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let set = SamplePathSet::new(self.config.name.clone(), pooled)?;
        match timestamps {
            Some(ts) => set.with_timestamps(ts),
            None => Ok(set),
        }
    }

    /// Combine models from a store by name.
    pub fn combine_store(
        &self,
        store: &SamplePathStore,
        shares: &[(&str, Share)],
    ) -> Result<SamplePathSet> {
        let members = shares
            .iter()
            .map(|&(model, share)| {
                store
                    .get(model)
                    .map(|paths| EnsembleMember { paths, share })
            })
            .collect::<Result<Vec<_>>>()?;
        self.combine(&members)
    }

    /// Number of paths each member contributes.
    ///
    /// Replicate counts are used as given. Weights are normalised and
    /// apportioned over the pool size by largest remainder, so the counts
    /// always sum to the pool size exactly.
    pub fn allocation(&self, members: &[EnsembleMember<'_>]) -> Result<Vec<usize>> {
        if members.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        match share_kind(members)? {
            ShareKind::Replicates => Ok(members
                .iter()
                .map(|m| match m.share {
                    Share::Replicates(k) => k,
                    Share::Weight(_) => 0,
                })
                .collect()),
            ShareKind::Weights => {
                let weights = normalised_weights(members)?;
                let pool_size = self
                    .config
                    .pool_size
                    .unwrap_or_else(|| members.iter().map(|m| m.paths.len()).sum());
                Ok(largest_remainder(&weights, pool_size))
            }
        }
    }
}

/// Weighted average of the members' per-step mean forecasts.
///
/// Replicate counts act as weights. This is the point forecast of a
/// combination; it equals the mean of the pooled ensemble whenever every
/// member's contribution is a whole number of copies of its paths.
pub fn combination_mean(members: &[EnsembleMember<'_>]) -> Result<Vec<f64>> {
    check_members(members)?;
    let weights = normalised_weights(members)?;

    let horizon = members[0].paths.horizon();
    let mut combined = vec![0.0; horizon];
    for (member, w) in members.iter().zip(weights.iter()) {
        for (acc, m) in combined.iter_mut().zip(member.paths.means()) {
            *acc += w * m;
        }
    }
    Ok(combined)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShareKind {
    Replicates,
    Weights,
}

fn share_kind(members: &[EnsembleMember<'_>]) -> Result<ShareKind> {
    let kind_of = |share: Share| match share {
        Share::Replicates(_) => ShareKind::Replicates,
        Share::Weight(_) => ShareKind::Weights,
    };
    let first = kind_of(members[0].share);
    if members.iter().any(|m| kind_of(m.share) != first) {
        return Err(ForecastError::InvalidParameter(
            "ensemble members must all use replicate counts or all use weights".to_string(),
        ));
    }
    Ok(first)
}

/// Member weights scaled to sum to one.
fn normalised_weights(members: &[EnsembleMember<'_>]) -> Result<Vec<f64>> {
    if members.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    share_kind(members)?;

    let raw: Vec<f64> = members
        .iter()
        .map(|m| match m.share {
            Share::Replicates(k) => k as f64,
            Share::Weight(w) => w,
        })
        .collect();

    if let Some(bad) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ForecastError::InvalidParameter(format!(
            "ensemble weights must be finite and non-negative, got {bad}"
        )));
    }
    let sum: f64 = raw.iter().sum();
    if sum <= 0.0 {
        return Err(ForecastError::InvalidParameter(
            "ensemble weights must have a positive sum".to_string(),
        ));
    }
    if !sum.is_finite() {
        return Err(ForecastError::InvalidParameter(format!(
            "ensemble weights sum to {sum}; rescale them"
        )));
    }
    Ok(raw.iter().map(|w| w / sum).collect())
}

/// Apportion `total` items by largest remainder. Ties go to the earlier member.
fn largest_remainder(weights: &[f64], total: usize) -> Vec<usize> {
    let quotas: Vec<f64> = weights.iter().map(|w| w * total as f64).collect();
    let mut counts: Vec<usize> = quotas.iter().map(|q| q.floor() as usize).collect();

    let assigned: usize = counts.iter().sum();
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = quotas[a] - quotas[a].floor();
        let rb = quotas[b] - quotas[b].floor();
        rb.total_cmp(&ra)
    });

    for &i in order.iter().take(total.saturating_sub(assigned)) {
        counts[i] += 1;
    }
    counts
}

/// First `count` paths of `set`, cycling when it has fewer.
fn draw(set: &SamplePathSet, count: usize) -> impl Iterator<Item = Vec<f64>> + '_ {
    set.paths().iter().cycle().take(count).cloned()
}

/// Validate horizons and timestamps; returns the shared timestamps, if any.
fn check_members(members: &[EnsembleMember<'_>]) -> Result<Option<Vec<DateTime<Utc>>>> {
    let first = members.first().ok_or(ForecastError::EmptyData)?;
    let horizon = first.paths.horizon();

    let mut timestamps: Option<&[DateTime<Utc>]> = None;
    for member in members {
        if member.paths.horizon() != horizon {
            return Err(ForecastError::IncompatibleHorizon {
                expected: horizon,
                got: member.paths.horizon(),
            });
        }
        if let Some(ts) = member.paths.timestamps() {
            match timestamps {
                Some(shared) if shared != ts => {
                    return Err(ForecastError::TimestampError(format!(
                        "timestamps of '{}' disagree with other ensemble members",
                        member.paths.name()
                    )));
                }
                Some(_) => {}
                None => timestamps = Some(ts),
            }
        }
    }
    Ok(timestamps.map(|ts| ts.to_vec()))
}
