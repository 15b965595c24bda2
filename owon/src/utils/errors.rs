use std::io;

#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err);
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

/// Errors raised while decoding a capture.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("Capture ended while reading {field} at byte {offset}")]
    TruncatedInput { field: &'static str, offset: u64 },

    #[error("Voltage level index must be between 0 and 20. Read {0}")]
    VoltageLevelIndex(i32),

    #[error("Channel {channel} declares a negative sample count: {count}")]
    InvalidSampleCount { channel: String, count: i32 },

    #[error("Unrecognized model identifier {0:?}")]
    UnrecognizedModel(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised by the network byte source.
#[derive(thiserror::Error, Debug)]
pub enum ResponseError {
    #[error("Could not connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Response ended inside the header of frame {frame}")]
    TruncatedHeader { frame: u32 },

    #[error("Response ended inside frame {frame}/{frames}: received {received} of {expected} bytes")]
    TruncatedFrame {
        frame: u32,
        frames: u32,
        received: u32,
        expected: u32,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
