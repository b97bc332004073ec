//! HTTP utility functions for extracting request information.

use actix_web::HttpRequest;

/// Extract client IP address from request headers
///
/// Attempts to extract the real client IP from common proxy headers,
/// falling back to the connection peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    let ip_headers = ["X-Forwarded-For", "X-Real-IP", "Forwarded-For"];

    for header_name in &ip_headers {
        if let Some(header_str) = req.headers().get(*header_name).and_then(|h| h.to_str().ok()) {
            // X-Forwarded-For can contain multiple IPs, take the first one
            let ip = header_str.split(',').next().unwrap_or(header_str).trim();
            if !ip.is_empty() {
                return ip.to_string();
            }
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
