use anyhow::Context;
use chessfront::event::{GameRequest, GameServer, ServerResponse, TransportError};
use log::debug;
use url::Url;


// Blocking HTTP transport: one POST with a JSON body per request.
pub struct HttpGameServer {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpGameServer {
    pub fn new(base_url: Url) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("chessfront/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Creating HTTP client")?;
        Ok(HttpGameServer { client, base_url })
    }
}

impl GameServer for HttpGameServer {
    fn send(&self, request: &GameRequest) -> Result<ServerResponse, TransportError> {
        let url = self
            .base_url
            .join(request.endpoint())
            .map_err(|err| TransportError(format!("Bad endpoint URL: {}", err)))?;
        debug!("POST {} {:?}", url, request);
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .map_err(|err| TransportError(err.to_string()))?;
        // Rejected moves come back as 400 with a regular JSON body, so the status code alone
        // does not mean failure.
        let status = response.status();
        response
            .json::<ServerResponse>()
            .map_err(|err| TransportError(format!("HTTP {}: {}", status, err)))
    }
}
