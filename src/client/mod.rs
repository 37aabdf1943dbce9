mod builder;
mod channel;
mod connection;
mod factory;
mod frames;
mod http_channel;
mod normalize;
mod statement;

pub use builder::ConnectionFactoryBuilder;
pub use channel::RpcChannel;
pub use connection::Connection;
pub use factory::{ConnectionFactory, DEFAULT_CLIENT_LABEL};
pub use http_channel::HttpChannel;
