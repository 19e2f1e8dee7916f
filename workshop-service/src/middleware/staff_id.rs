use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;
use workshop_core::error::AppError;

/// StaffId extractor.
///
/// Extracts the acting staff member from the X-Staff-ID header set by the
/// authenticating edge. Order creation records this as the order's author.
#[derive(Debug, Clone, Copy)]
pub struct StaffId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for StaffId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get("X-Staff-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing X-Staff-ID header")))?;

        let staff_id = Uuid::parse_str(raw).map_err(|_| {
            AppError::Unauthorized(anyhow::anyhow!("X-Staff-ID header is not a valid UUID"))
        })?;

        tracing::Span::current().record("staff_id", raw);

        Ok(StaffId(staff_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn extracts_valid_uuid() {
        let id = Uuid::new_v4();
        let req = Request::builder()
            .header("X-Staff-ID", id.to_string())
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let extracted = StaffId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.0, id);
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();

        let result = StaffId::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn rejects_malformed_uuid() {
        let req = Request::builder()
            .header("X-Staff-ID", "not-a-uuid")
            .body(())
            .unwrap();
        let (mut parts, _) = req.into_parts();

        let result = StaffId::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
