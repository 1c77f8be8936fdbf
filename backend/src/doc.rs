//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the
//! request and response bodies they use, the shared error envelope, and the
//! bearer-token security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use crate::inbound::http::contributions::{
    ApproveContributionBody, ApproveContributionResponseBody, CodeSnippetBody,
    RejectContributionBody, RejectContributionResponseBody, SubmitContributionBody,
    SubmitContributionResponseBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{CurrentUserResponseBody, UserProfileBody};
use crate::inbound::http::webhooks::WebhookResponseBody;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by the identity provider."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Pattern hub backend API",
        description = "Contribution review, identity synchronisation and profile endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::contributions::approve_contribution,
        crate::inbound::http::contributions::reject_contribution,
        crate::inbound::http::contributions::submit_contribution,
        crate::inbound::http::webhooks::identity_webhook,
        crate::inbound::http::users::current_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApproveContributionBody,
        ApproveContributionResponseBody,
        RejectContributionBody,
        RejectContributionResponseBody,
        SubmitContributionBody,
        SubmitContributionResponseBody,
        CodeSnippetBody,
        CurrentUserResponseBody,
        UserProfileBody,
        WebhookResponseBody,
        ErrorSchema,
        ErrorCodeSchema,
    )),
    tags(
        (name = "contributions", description = "Submission and admin review of implementations"),
        (name = "webhooks", description = "Identity provider event delivery"),
        (name = "users", description = "Operations related to users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI registration and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "error");
        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    fn approve_response_schema_is_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas
            .get("ApproveContributionResponseBody")
            .expect("approve response schema");

        assert_object_schema_has_field(schema, "creditsAwarded");
        assert_object_schema_has_field(schema, "userId");
    }

    #[rstest]
    #[case("/api/v1/admin/contributions/approve")]
    #[case("/api/v1/admin/contributions/reject")]
    #[case("/api/v1/contributions")]
    #[case("/api/v1/webhooks/identity")]
    #[case("/api/v1/users/me")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
