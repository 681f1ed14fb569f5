// Chaos middleware: when enabled, every request rolls a ten-sided die and may
// be delayed, failed or answered with an empty body before reaching its route.

use std::rc::Rc;
use std::time::Duration;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

const FAILURES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::NOT_IMPLEMENTED,
    StatusCode::BAD_GATEWAY,
    StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrollOutcome {
    Delay,
    Fail(StatusCode),
    Empty,
    Pass,
}

impl TrollOutcome {
    pub fn from_roll<R: Rng + ?Sized>(roll: u8, rng: &mut R) -> Self {
        match roll {
            1 => TrollOutcome::Delay,
            2 => TrollOutcome::Fail(
                FAILURES.choose(rng).copied().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ),
            3 => TrollOutcome::Empty,
            _ => TrollOutcome::Pass,
        }
    }
}

fn roll_d10() -> TrollOutcome {
    let mut rng = rand::thread_rng();
    let roll = rng.gen_range(1..=10);
    TrollOutcome::from_roll(roll, &mut rng)
}

/// Middleware factory. Disabled trolls forward every request untouched.
#[derive(Clone)]
pub struct Troll {
    enabled: bool,
    delay: Duration,
    dice: fn() -> TrollOutcome,
}

impl Troll {
    pub fn new(enabled: bool, delay: Duration) -> Self {
        Self { enabled, delay, dice: roll_d10 }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Troll
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = TrollMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TrollMiddleware {
            service: Rc::new(service),
            troll: self.clone(),
        }))
    }
}

pub struct TrollMiddleware<S> {
    service: Rc<S>,
    troll: Troll,
}

impl<S, B> Service<ServiceRequest> for TrollMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = if self.troll.enabled {
            (self.troll.dice)()
        } else {
            TrollOutcome::Pass
        };

        match outcome {
            TrollOutcome::Pass => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            TrollOutcome::Delay => {
                warn!(path = %req.path(), delay = ?self.troll.delay, "troll is stalling the request");
                let service = Rc::clone(&self.service);
                let delay = self.troll.delay;
                Box::pin(async move {
                    tokio::time::sleep(delay).await;
                    Ok(service.call(req).await?.map_into_left_body())
                })
            }
            TrollOutcome::Fail(status) => {
                warn!(path = %req.path(), status = status.as_u16(), "troll is failing the request");
                let response = HttpResponse::build(status)
                    .body(status.canonical_reason().unwrap_or("troll"));
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
            TrollOutcome::Empty => {
                warn!(path = %req.path(), "troll is swallowing the response");
                let response = HttpResponse::Ok().finish();
                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}
