pub mod aggregator;
pub mod counts;
pub mod markets;
pub mod odds;
pub mod period;
pub mod props;
pub mod series;

pub use aggregator::{LineSummary, ResultAggregator, SimResults};
pub use counts::{OutcomeCounts, Settlement};
pub use markets::{MarketConfig, MarketLine, SidesMarket, TotalScope, TotalsMarket};
pub use period::Period;
pub use props::{
    FirstInningProps, PlayerPropMarket, PlayerPropResult, PlayerStat, ScoringOrderProps,
    TeamCounts,
};
pub use series::{
    series_probability, series_probability_from_results, SeriesGameProbability,
    SeriesOutcomeProbability, SideSeriesProbability,
};
