use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("accelerometer unavailable: {0}")]
    HardwareUnavailable(String),
    #[error("i2c bus error: {0:?}")]
    Bus(embedded_hal::i2c::ErrorKind),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected device id: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedDevice { expected: u8, actual: u8 },
    #[error("{table} index {index} out of range (table has {len} entries)")]
    InvalidIndex {
        table: &'static str,
        index: usize,
        len: usize,
    },
    #[error("sample queue disconnected")]
    Disconnected,
    #[error("failed to render display list: {0}")]
    Render(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Render(format!("{value:?}"))
    }
}

impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Render(value.to_string())
    }
}
