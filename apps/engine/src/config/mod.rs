pub mod game;

pub use game::{
    BehaviorSettings, GameConfig, GameSection, GameSettings, MetricsSettings, CONFIG_PATH_ENV,
};
