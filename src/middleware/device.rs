use std::{convert::Infallible, net::SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};

use crate::{fingerprint::ClientDevice, state::AppState};

impl FromRequestParts<AppState> for ClientDevice {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientDevice::from_headers(
            &parts.headers,
            peer,
            &state.config.ip_hash_salt,
        ))
    }
}
