pub mod api;

pub use api::HttpInspirationGateway;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("inspiration request failed: {0}")]
    Request(String),
    #[error("inspiration service responded with error `{0}`")]
    Service(String),
    #[error("inspiration response had no usable content")]
    EmptyResponse,
}

pub trait InspirationGateway {
    fn request_verbal_hint(&self, caption: &str) -> Result<String, GatewayError>;
    fn request_visual_hint(&self, caption: &str) -> Result<String, GatewayError>;
}
