pub mod client;
pub mod error;
pub mod transform;
pub mod types;

pub use client::TextServiceClient;
pub use error::ServiceError;
pub use transform::{
    LocalRecognizer, ProofreadStage, Recognizer, TranslateStage, TransformService, Transformer,
};
pub use types::{TransformRequest, TransformResponse};
