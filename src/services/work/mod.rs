// 作業関数の具象実装

pub mod delay;
pub mod func;
pub mod limit;
pub mod passthrough;

pub use delay::DelayStage;
pub use func::FnProcessor;
pub use limit::Limit;
pub use passthrough::PassThrough;
