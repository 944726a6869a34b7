use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{
    ErrorResponse, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
};
use crate::modules::footprints::calculator::EmissionCategory;
use crate::modules::footprints::model::{
    CategoryTotal, CreateFootprintRequest, EmissionFactorResponse, Footprint, FootprintSummary,
    PaginatedFootprintsResponse, UpdateFootprintRequest,
};
use crate::modules::health::controller::HealthResponse;
use crate::modules::otp::model::{OtpPurpose, SendOtpRequest, VerifyOtpRequest, VerifyOtpResponse};
use crate::modules::profile::model::{
    ChangePasswordRequest, ProfileResponse, ProfileStats, UpdateProfileRequest,
};
use crate::modules::realtime::model::{FeedItem, LeaderboardEntry, LeaderboardResponse, LiveStats};
use crate::modules::users::model::User;
use ecotrack_core::PaginationMeta;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::test_db,
        crate::modules::health::controller::health,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_me,
        crate::modules::otp::controller::send_otp,
        crate::modules::otp::controller::verify_otp,
        crate::modules::footprints::controller::get_factors,
        crate::modules::footprints::controller::create_footprint,
        crate::modules::footprints::controller::get_footprints,
        crate::modules::footprints::controller::get_summary,
        crate::modules::footprints::controller::get_footprint,
        crate::modules::footprints::controller::update_footprint,
        crate::modules::footprints::controller::delete_footprint,
        crate::modules::profile::controller::get_profile,
        crate::modules::profile::controller::update_profile,
        crate::modules::profile::controller::change_password,
        crate::modules::realtime::controller::get_stats,
        crate::modules::realtime::controller::get_feed,
        crate::modules::realtime::controller::get_leaderboard,
    ),
    components(
        schemas(
            User,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            ErrorResponse,
            OtpPurpose,
            SendOtpRequest,
            VerifyOtpRequest,
            VerifyOtpResponse,
            EmissionCategory,
            Footprint,
            CreateFootprintRequest,
            UpdateFootprintRequest,
            PaginatedFootprintsResponse,
            FootprintSummary,
            CategoryTotal,
            EmissionFactorResponse,
            ProfileResponse,
            ProfileStats,
            UpdateProfileRequest,
            ChangePasswordRequest,
            LiveStats,
            FeedItem,
            LeaderboardEntry,
            LeaderboardResponse,
            HealthResponse,
            PaginationMeta,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Database and service probes"),
        (name = "Authentication", description = "Registration, login and session cookie"),
        (name = "OTP", description = "Emailed one-time codes"),
        (name = "Footprints", description = "Activity records and CO2e totals"),
        (name = "Profile", description = "Account details and personal stats"),
        (name = "Realtime", description = "Live site-wide aggregates")
    ),
    info(
        title = "EcoTrack API",
        version = "0.1.0",
        description = "Carbon-footprint tracking API built with Rust, Axum, and MySQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
