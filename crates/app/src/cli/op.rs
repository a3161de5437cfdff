use std::error::Error;

use common::prelude::{AdminClient, Config, LazyAdminClient};

#[derive(Clone, Debug)]
pub struct OpContext {
    /// Resolved endpoint and credentials
    pub config: Config,
}

impl OpContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the admin client. Fails when the host or token is missing, so
    /// commands that never touch the cluster still work unconfigured.
    pub fn client(&self) -> Result<AdminClient, common::prelude::Error> {
        AdminClient::new(&self.config)
    }

    /// A client that only validates the configuration once a request is
    /// actually sent.
    pub fn lazy_client(&self) -> LazyAdminClient {
        LazyAdminClient::new(self.config.clone())
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
