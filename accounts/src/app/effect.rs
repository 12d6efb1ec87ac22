use super::{Action, Call, MountId, Route};
use accounts_core::{api, FormData};
use std::time::Duration;
use tokio::time;

/// Connections to external services that effects use. We keep these around
/// to share one connection pool across the whole app.
pub struct EffectContext {
    /// an HTTP client with reqwest
    http: reqwest::Client,

    /// Where the account API lives
    api: api::Client,
}

impl EffectContext {
    /// Get a new `EffectContext` talking to `api`
    pub fn new(api: api::Client) -> Self {
        Self {
            http: reqwest::Client::new(),
            api,
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug)]
pub enum Effect {
    /// Create a new account
    Register { mount: MountId, form: FormData },

    /// Log in to an existing account
    Login { mount: MountId, form: FormData },

    /// Change the account the token belongs to
    Update {
        mount: MountId,
        form: FormData,
        token: String,
    },

    /// Load the account the token belongs to
    FetchDetails { mount: MountId, token: String },

    /// Go somewhere else after a pause
    NavigateAfter {
        mount: MountId,
        route: Route,
        delay: Duration,
    },

    /// Abort everything still running for a page visit that is over. The
    /// shell handles this one itself instead of running it.
    Cancel(MountId),
}

impl Effect {
    /// The page visit this effect belongs to, so the shell can abort it
    /// when the visit ends.
    pub fn mount(&self) -> Option<MountId> {
        match self {
            Self::Register { mount, .. }
            | Self::Login { mount, .. }
            | Self::Update { mount, .. }
            | Self::FetchDetails { mount, .. }
            | Self::NavigateAfter { mount, .. } => Some(*mount),
            Self::Cancel(_) => None,
        }
    }

    /// A name to log. (Not `Debug`: the form holds the password.)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Login { .. } => "login",
            Self::Update { .. } => "update",
            Self::FetchDetails { .. } => "fetch details",
            Self::NavigateAfter { .. } => "navigate after",
            Self::Cancel(_) => "cancel",
        }
    }

    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle. API calls never fail here:
    /// transport problems come back inside the response.
    pub async fn run(self, ctx: &EffectContext) -> Option<Action> {
        match self {
            Self::Register { mount, form } => {
                tracing::info!(?mount, "registering");

                let response = ctx.api.register(&ctx.http, &form).await;

                Some(Action::Responded {
                    mount,
                    call: Call::Register,
                    response,
                })
            }

            Self::Login { mount, form } => {
                tracing::info!(?mount, "logging in");

                let response = ctx.api.login(&ctx.http, &form).await;

                Some(Action::Responded {
                    mount,
                    call: Call::Login,
                    response,
                })
            }

            Self::Update { mount, form, token } => {
                tracing::info!(?mount, "updating account");

                let response = ctx.api.update(&ctx.http, &form, &token).await;

                Some(Action::Responded {
                    mount,
                    call: Call::Update,
                    response,
                })
            }

            Self::FetchDetails { mount, token } => {
                tracing::info!(?mount, "fetching account details");

                let response = ctx.api.details(&ctx.http, &token).await;

                Some(Action::Responded {
                    mount,
                    call: Call::Details,
                    response,
                })
            }

            Self::NavigateAfter {
                mount,
                route,
                delay,
            } => {
                time::sleep(delay).await;

                Some(Action::Navigate { mount, route })
            }

            Self::Cancel(mount) => {
                tracing::debug!(?mount, "cancel is handled by the shell, nothing to run");

                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tokio::time::Instant;

    fn context() -> EffectContext {
        EffectContext::new(api::Client::new("http://127.0.0.1:9/").unwrap())
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn navigate_after_waits_for_the_delay() {
        let mount = MountId::first();
        let start = Instant::now();

        let action = Effect::NavigateAfter {
            mount,
            route: Route::Login,
            delay: Duration::from_millis(500),
        }
        .run(&context())
        .await;

        assert!(start.elapsed() >= Duration::from_millis(500));
        assert!(matches!(
            action,
            Some(Action::Navigate {
                route: Route::Login,
                ..
            })
        ));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn navigate_after_is_not_due_early() {
        let effect = Effect::NavigateAfter {
            mount: MountId::first(),
            route: Route::Login,
            delay: Duration::from_millis(500),
        };

        let early = time::timeout(Duration::from_millis(499), effect.run(&context())).await;

        assert!(early.is_err());
    }

    #[test]
    fn cancel_has_no_mount() {
        assert_eq!(Effect::Cancel(MountId::first()).mount(), None);
    }
}
