use thiserror::Error;

/// Why the throwaway Redis server behind the storage integration tests
/// could not be used.
#[derive(Debug, Error)]
pub enum TestInfraError {
    /// Docker could not start the container or map its port.
    #[error("redis test container unavailable: {0}")]
    Container(#[from] testcontainers::TestcontainersError),

    /// The server is up but a client could not connect or issue a command.
    #[error("redis test server refused the client: {0}")]
    Client(#[from] redis::RedisError),

    /// The server answered the readiness check with something other than
    /// `PONG`.
    #[error("redis test server not ready, PING answered {0:?}")]
    NotReady(String),
}

pub type Result<T, E = TestInfraError> = std::result::Result<T, E>;
