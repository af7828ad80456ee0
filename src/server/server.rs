use bytes::Bytes;
use chrono_tz::Tz;
use http_body_util::{BodyExt, Full};
use hyper::{body::Incoming, service::Service, Method, Request, Response, StatusCode};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use regex::Regex;
use serde::Serialize;

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{
    availability::resolver,
    database::sqlite::SqliteDatabase,
    server::payloads::{ClosureUpdate, HoursOverview, HoursUpdate, UpdateOutcome},
    timing::business_time::business_now,
    ISO_FORMAT,
};

/// The HTTP face of the engine.
///
/// One GET endpoint for the storefront, one GET and two POSTs for the
/// admin screen. Implements hyper's `Service` trait; a clone of this
/// struct serves each connection, so everything it holds is shared or
/// cheap to copy.
///
/// The status endpoint always answers 200 with a definite body;
/// failures underneath become a closed status, never an error the
/// storefront has to interpret.
#[derive(Clone)]
pub struct Server {
    connection_pool: Arc<Pool<SqliteConnectionManager>>,
    timezone: Tz,
    time_validator: Regex,
}

impl Server {
    pub fn setup(connection_pool: Arc<Pool<SqliteConnectionManager>>, timezone: Tz) -> Self {
        Self {
            connection_pool,
            timezone,
            time_validator: Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap(),
        }
    }

    /// Obtain a connection from the connection pool.
    fn get_connection(&self) -> Result<PooledConnection<SqliteConnectionManager>, String> {
        self.connection_pool
            .get()
            .map_err(|err| format!("could not get a database connection: {}", err))
    }

    /// The /api/status endpoint: the one question the storefront asks
    /// before letting an order through.
    fn status(&self) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let status = resolver::current_status(&self.connection_pool, self.timezone);
        Self::ok_data(status)
    }

    /// The GET /api/hours endpoint: the full weekly schedule plus the
    /// closure record, for the admin screen.
    fn hours_overview(&self) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let connection = match self.get_connection() {
            Ok(connection) => connection,
            Err(err) => return Self::server_error(&err),
        };

        let business_hours = match SqliteDatabase::query_all_day_schedules(&connection) {
            Ok(business_hours) => business_hours,
            Err(err) => return Self::server_error(&err.to_string()),
        };
        let temporary_closure = match SqliteDatabase::query_temporary_closure(&connection) {
            Ok(temporary_closure) => temporary_closure,
            Err(err) => return Self::server_error(&err.to_string()),
        };

        Self::ok_data(HoursOverview {
            business_hours,
            temporary_closure,
        })
    }

    /// The POST /api/hours endpoint: replace one day's schedule.
    ///
    /// Validates before touching the store: the day must be 0..=6 and
    /// any supplied time must be strict HH:MM. A failed write surfaces
    /// as a 500 to the admin caller; the read path never sees it.
    async fn update_hours(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let body = req.into_body().collect().await?.to_bytes();
        let update: HoursUpdate = match serde_json::from_slice(&body) {
            Ok(update) => update,
            Err(_) => return Self::bad_request("Malformed JSON body."),
        };

        if update.day_of_week > 6 {
            return Self::bad_request("dayOfWeek must be between 0 and 6.");
        }
        for time in [update.open_time.as_deref(), update.close_time.as_deref()]
            .into_iter()
            .flatten()
        {
            if !self.time_validator.is_match(time) {
                return Self::bad_request("Times must be in HH:MM format.");
            }
        }

        let connection = match self.get_connection() {
            Ok(connection) => connection,
            Err(err) => return Self::server_error(&err),
        };
        match SqliteDatabase::upsert_day_schedule(&connection, &update.into_schedule()) {
            Ok(()) => Self::ok_data(UpdateOutcome { success: true }),
            Err(err) => Self::server_error(&err.to_string()),
        }
    }

    /// The POST /api/closure endpoint: flip the emergency override.
    async fn update_closure(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let body = req.into_body().collect().await?.to_bytes();
        let update: ClosureUpdate = match serde_json::from_slice(&body) {
            Ok(update) => update,
            Err(_) => return Self::bad_request("Malformed JSON body."),
        };

        let connection = match self.get_connection() {
            Ok(connection) => connection,
            Err(err) => return Self::server_error(&err),
        };
        let last_updated = business_now(self.timezone).format(ISO_FORMAT).to_string();
        match SqliteDatabase::upsert_temporary_closure(
            &connection,
            update.is_closed,
            update.reason.as_deref(),
            &last_updated,
        ) {
            Ok(()) => Self::ok_data(UpdateOutcome { success: true }),
            Err(err) => Self::server_error(&err.to_string()),
        }
    }

    /// Return a 200 OK response with the data provided.
    fn ok_data<T: Serialize>(body: T) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let data = match serde_json::to_string(&body) {
            Ok(data) => data,
            Err(err) => return Self::server_error(&err.to_string()),
        };
        let res = Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(data)))
            .unwrap();
        Ok(res)
    }

    fn error_body(status: StatusCode, message: &str) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let body = serde_json::json!({ "error": message }).to_string();
        let res = Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .unwrap();
        Ok(res)
    }

    /// Return a 500 Internal Server Error response with the message provided.
    fn server_error(message: &str) -> Result<Response<Full<Bytes>>, hyper::Error> {
        tracing::error!("request failed: {}", message);
        Self::error_body(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Return a 400 Bad Request response with the message provided.
    fn bad_request(message: &str) -> Result<Response<Full<Bytes>>, hyper::Error> {
        Self::error_body(StatusCode::BAD_REQUEST, message)
    }

    /// Return a 404 Not Found response with an empty body.
    fn not_found() -> Result<Response<Full<Bytes>>, hyper::Error> {
        let res = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::new()))
            .unwrap();
        Ok(res)
    }
}

impl Service<Request<Incoming>> for Server {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let server = self.clone();
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_string();
            match (method, path.as_str()) {
                (Method::GET, "/api/status") => server.status(),
                (Method::GET, "/api/hours") => server.hours_overview(),
                (Method::POST, "/api/hours") => server.update_hours(req).await,
                (Method::POST, "/api/closure") => server.update_closure(req).await,
                _ => Server::not_found(),
            }
        })
    }
}
