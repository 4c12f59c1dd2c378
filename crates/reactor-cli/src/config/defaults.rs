use reactorsim::engine::config::SearchMethod;

pub struct DefaultsConfig {
    pub max_time: f64,
    pub dt: f64,
    pub save_interval: f64,
    pub target_time: f64,
    pub method: SearchMethod,
    pub iterations: usize,
    pub seed: u64,
    pub batch_size: usize,
    pub save_path: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_time: 1260.0,
            dt: 1.0,
            save_interval: 10.0,
            target_time: 1260.0,
            method: SearchMethod::Hybrid,
            iterations: 100,
            seed: 42,
            batch_size: 32,
            save_path: "optimized_configuration.json".to_string(),
        }
    }
}
