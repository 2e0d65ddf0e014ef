//! Route labels for spans and metrics.

use uuid::Uuid;

/// Request path with identifier segments collapsed, so `/orders/<uuid>` is one route.
pub(super) fn route_label(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_paths_share_a_label() {
        assert_eq!(
            route_label("/orders/01968d2e-6a31-7c2b-9a4e-2f1e0d3c4b5a"),
            "/orders/{uuid}",
            "uuid segment is collapsed"
        );
        assert_eq!(route_label("/checkout/quote"), "/checkout/quote", "static path is kept");
        assert_eq!(route_label("/"), "/", "root is kept");
    }
}
