use axum::extract::{ConnectInfo, FromRequestParts, multipart};
use axum::http::request::Parts;
use std::convert::Infallible;
use std::io::{BufWriter, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::http::error::{HttpError, HttpResult};
use crate::storage::WrittenFile;

/// Caller address used for rate-limit accounting: first `X-Forwarded-For`
/// entry, then `X-Real-IP`, then the socket peer when the server runs with
/// connect info.
pub struct ClientIp(pub IpAddr);

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = ["x-forwarded-for", "x-real-ip"].into_iter().find_map(|name| {
            parts
                .headers
                .get(name)?
                .to_str()
                .ok()?
                .split(',')
                .next()?
                .trim()
                .parse::<IpAddr>()
                .ok()
        });

        let ip = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|info| info.0.ip())
            })
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        Ok(ClientIp(ip))
    }
}

/// Streams a multipart field into a temporary file, bailing out as soon as
/// `max_size` is exceeded. Nothing reaches the photo storage until the
/// caller persists the result.
pub async fn write_field_to_file(
    mut field: multipart::Field<'_>,
    max_size: usize,
) -> HttpResult<WrittenFile> {
    let mut written_file = WrittenFile::new()?;

    let mut writer = BufWriter::new(written_file.as_file_mut());
    let mut written_bytes = 0;

    while let Some(chunk) = field.chunk().await? {
        written_bytes += chunk.len();
        if written_bytes > max_size {
            return Err(HttpError::bad_request("File too large. Max size is 10MB."));
        }
        writer.write_all(&chunk)?;
    }

    writer.flush()?;
    drop(writer);

    written_file.size = written_bytes;
    Ok(written_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract_ip(request: Request<()>) -> IpAddr {
        let (mut parts, _) = request.into_parts();
        let ClientIp(ip) = ClientIp::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        ip
    }

    #[tokio::test]
    async fn forwarded_for_takes_first_entry() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();

        assert_eq!(extract_ip(request).await, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn real_ip_is_fallback() {
        let request = Request::builder()
            .header("x-real-ip", "198.51.100.4")
            .body(())
            .unwrap();

        assert_eq!(extract_ip(request).await, "198.51.100.4".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn unknown_caller_is_unspecified() {
        let request = Request::builder().body(()).unwrap();
        assert_eq!(extract_ip(request).await, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
