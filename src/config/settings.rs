const DEFAULT_DATABASE_PATH: &str = "seat_racing.db";

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub initial_rating: f64,
    /// Rating points separating athletes when one is twice as strong
    pub points_per_doubling: f64,
    /// Drawn games each athlete plays against an average reference
    pub virtual_games_weight: f64,
    /// Margin (s/500m) at which a win carries ~63% of full evidence
    pub margin_scale: f64,
    /// Age decay of comparisons, measured back from the newest piece.
    ///
    /// 0 turns decay off. Any positive half-life lets a later piece shrink
    /// older evidence, so an extra win can then lower the winner's rating.
    pub half_life_days: f64,
    pub convergence_tolerance: f64,
    pub max_iterations: usize,
    pub comparison_scale: f64,
    pub variance_scale: f64,
    pub connectivity_weight: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial_rating: 1000.0,
            points_per_doubling: 100.0,
            virtual_games_weight: 2.0,
            margin_scale: 1.0,
            half_life_days: 0.0,
            convergence_tolerance: 1e-6,
            max_iterations: 100,
            comparison_scale: 4.0,
            variance_scale: 1.0,
            connectivity_weight: 0.6,
        }
    }
}

impl RatingSettings {
    pub fn consistency_weight(&self) -> f64 {
        1.0 - self.connectivity_weight
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    /// Rosters smaller than this use a manual rotation
    pub min_latin_order: usize,
    /// Upper bound on pieces per request
    pub max_pieces: usize,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            min_latin_order: 4,
            max_pieces: 500,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
    /// Used when a submitted piece omits its distance
    pub default_distance_meters: f64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string()),
            default_distance_meters: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub schedule: ScheduleSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database_path(mut self, path: impl Into<String>) -> Self {
        self.storage.database_path = path.into();
        self
    }
}
