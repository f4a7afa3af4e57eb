use actix_web::{
    http::{
        header::{HeaderMap, HeaderName, HeaderValue},
        StatusCode,
    },
    HttpResponse, HttpResponseBuilder,
};

/// Response sink shared by a chain of handlers.
///
/// The first status write commits the response: the status and the headers
/// set up to that point are what the client receives. Status writes and
/// header inserts after the commit are dropped. Body writes always append,
/// so every handler in a chain that writes a body contributes to it.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn is_committed(&self) -> bool {
        self.status.is_some()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        if self.is_committed() {
            log::debug!("ignoring header {} set after the response was committed", name);
            return;
        }
        self.headers.insert(name, value);
    }

    pub fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(current) => {
                log::debug!("superfluous status write {} (response already {})", status, current);
            }
            None => self.status = Some(status),
        }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        if !self.is_committed() {
            self.status = Some(StatusCode::OK);
        }
        self.body.extend_from_slice(bytes);
    }

    pub fn into_response(self) -> HttpResponse {
        let mut response = HttpResponseBuilder::new(self.status.unwrap_or(StatusCode::OK));
        for (name, value) in &self.headers {
            response.insert_header((name.clone(), value.clone()));
        }
        response.body(self.body)
    }
}
