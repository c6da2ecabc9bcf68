//! Route definitions for the application

use dioxus::prelude::*;
use uuid::Uuid;

use crate::components::{RequireAdmin, RequireAuth, Shell};
use crate::pages::admin::{AdminDashboard, AdminReports, AdminUsers};
use crate::pages::{
    Dashboard, Donations, Login, NotificationsPage, Profile, Register, RequestDetail, Requests,
};

/// All application routes
#[derive(Clone, Debug, PartialEq, Routable)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Shell)]
        // Public routes
        #[route("/login")]
        Login {},

        #[route("/register")]
        Register {},

        // Authenticated routes
        #[layout(RequireAuth)]
            #[route("/")]
            Dashboard {},

            #[route("/requests")]
            Requests {},

            #[route("/requests/:id")]
            RequestDetail { id: Uuid },

            #[route("/donations")]
            Donations {},

            #[route("/notifications")]
            NotificationsPage {},

            #[route("/profile")]
            Profile {},

            // Admin routes
            #[nest("/admin")]
                #[layout(RequireAdmin)]
                    #[route("/")]
                    AdminDashboard {},

                    #[route("/users")]
                    AdminUsers {},

                    #[route("/reports")]
                    AdminReports {},
                #[end_layout]
            #[end_nest]
        #[end_layout]
    #[end_layout]
}
