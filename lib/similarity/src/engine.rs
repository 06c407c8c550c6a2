//! The likeday engine
//!
//! Ties the pieces together for one request: validate, fetch records from
//! the [`DaySource`], build the reference vector and candidate pool, rank,
//! and package the result with its reusable day vectors and chart rows.

use crate::analysis::{AnalysisRequest, AnalysisResult, ChartData, DayVectorCache, SecondaryRequest};
use crate::explain::PoolSummary;
use crate::pool::CandidatePool;
use crate::project::{DaySet, Projection, SecondaryProjector};
use crate::rerank::{SimilarityRanker, DEFAULT_PARALLEL_THRESHOLD};
use likeday_core::{DayRecordSet, DaySource, DayVector, DayVectorBuilder, Error, MatchVariable, Result};
use tracing::{debug, info};

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Pools at least this large compute distances with rayon
    pub parallel_threshold: usize,
    /// Attach raw hourly rows for charting to results and projections
    pub include_chart_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            include_chart_data: true,
        }
    }
}

/// Runs likeday analyses against a day source
pub struct LikedayEngine<S: DaySource> {
    source: S,
    config: EngineConfig,
    builder: DayVectorBuilder,
    projector: SecondaryProjector,
}

impl<S: DaySource> LikedayEngine<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: S, config: EngineConfig) -> Self {
        Self {
            source,
            config,
            builder: DayVectorBuilder::new(),
            projector: SecondaryProjector::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Find the `top_n` days most similar to the reference day
    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        request.validate()?;
        let ranker = SimilarityRanker::new(request.top_n, request.euclidean_weight)?
            .with_parallel_threshold(self.config.parallel_threshold);

        let reference_date = request.reference_date;
        let mut records = self.source.fetch_range(request.start_date, request.end_date)?;
        if !records.contains_day(&reference_date) {
            records.merge(self.source.fetch_days(&[reference_date])?);
        }

        let reference_vector = self.reference_vector(request, &records)?;
        let pool = CandidatePool::build(
            &self.builder,
            &records,
            &request.match_variable,
            reference_date,
            request.start_date,
            request.end_date,
        );
        debug!(
            candidates = pool.len(),
            excluded = pool.excluded().len(),
            "candidate pool built"
        );
        if pool.is_empty() {
            return Err(Error::InsufficientData(format!(
                "no comparable days for {} between {} and {} ({} days excluded)",
                request.match_variable,
                request.start_date,
                request.end_date,
                pool.excluded().len()
            )));
        }

        let ranking = ranker.rank(&reference_vector, &pool)?;

        let mut day_vectors = DayVectorCache::new();
        day_vectors.insert(&reference_vector);
        for score in &ranking.scores {
            if let Some(vector) = find_vector(pool.vectors(), score.day) {
                day_vectors.insert(vector);
            }
        }

        let mut chart_data = ChartData::new();
        if self.config.include_chart_data {
            let charted = std::iter::once(reference_date).chain(ranking.scores.iter().map(|s| s.day));
            for day in charted {
                if let Some(rows) = records.get(&day) {
                    chart_data.insert(&request.match_variable, day, rows.clone());
                }
            }
        }

        info!(
            reference = %reference_date,
            variable = %request.match_variable,
            mode = %request.reference_mode,
            pool = ranking.pool_size,
            returned = ranking.scores.len(),
            "likeday analysis complete"
        );

        let pool_summary = PoolSummary::from_ranking(&ranking, pool.excluded().to_vec());
        Ok(AnalysisResult {
            reference_date,
            match_variable: request.match_variable.clone(),
            reference_mode: request.reference_mode,
            top_n: request.top_n,
            euclidean_weight: request.euclidean_weight,
            similarity_scores: ranking.scores,
            day_vectors,
            chart_data,
            pool_summary,
        })
    }

    /// Project a new variable onto the day-set of an earlier analysis.
    ///
    /// Only days with neither a cached series nor charted rows are fetched.
    pub fn project(&self, result: &AnalysisResult, variable: &MatchVariable) -> Result<Projection> {
        let day_set = DaySet::from_result(result);
        let mut records = result.chart_data.to_record_set();

        let missing = self
            .projector
            .required_days(&day_set, variable, &result.day_vectors, &records);
        if !missing.is_empty() {
            debug!(days = missing.len(), "fetching records for projection");
            records.merge(self.source.fetch_days(&missing)?);
        }

        Ok(self.finish_projection(
            self.projector
                .project(&day_set, variable, &result.day_vectors, &records),
        ))
    }

    /// Project onto a day-set supplied directly by the caller
    pub fn project_request(&self, request: &SecondaryRequest) -> Result<Projection> {
        let day_set = DaySet::from_request(request);
        let records = self.source.fetch_days(&day_set.all_days())?;
        Ok(self.finish_projection(self.projector.project(
            &day_set,
            &request.match_variable,
            &DayVectorCache::new(),
            &records,
        )))
    }

    fn finish_projection(&self, mut projection: Projection) -> Projection {
        if !self.config.include_chart_data {
            projection.chart_data = ChartData::new();
        }
        projection
    }

    fn reference_vector(&self, request: &AnalysisRequest, records: &DayRecordSet) -> Result<DayVector> {
        let day = request.reference_date;
        let variable = request.reference_variable();
        let day_records = records.get(&day).ok_or_else(|| {
            Error::InvalidParameter(format!("reference day {day} has no data"))
        })?;

        self.builder
            .build(day, &variable, day_records)
            .map_err(|e| Error::InvalidParameter(format!("reference day {day} cannot be used: {e}")))
    }
}

/// Pool vectors are chronological and unique per day
fn find_vector(vectors: &[DayVector], day: chrono::NaiveDate) -> Option<&DayVector> {
    vectors
        .binary_search_by_key(&day, |v| v.day)
        .ok()
        .map(|idx| &vectors[idx])
}
