//! Route table for the public intake pages and the moderation screens.
//!
//! Every endpoint is declared once here. The router mounts each entry and puts the
//! `admin_only` ones behind the admin gate; views build links through [`reverse`].

use super::domain::ProfileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteName {
    TalentList,
    CollaborationList,
    AdminProfileChangelist,
    AdminProfileChange,
    AdminProfileBulkAction,
    ApproveTalent,
    RejectTalent,
    AdminCollaborationChangelist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: RouteName,
    pub path: &'static str,
    pub admin_only: bool,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        name: RouteName::TalentList,
        path: "/",
        admin_only: false,
    },
    RouteEntry {
        name: RouteName::CollaborationList,
        path: "/collaborations/",
        admin_only: false,
    },
    RouteEntry {
        name: RouteName::AdminProfileChangelist,
        path: "/admin/talents/profile/",
        admin_only: true,
    },
    RouteEntry {
        name: RouteName::AdminProfileChange,
        path: "/admin/talents/profile/:id/change/",
        admin_only: true,
    },
    RouteEntry {
        name: RouteName::AdminProfileBulkAction,
        path: "/admin/talents/profile/actions/",
        admin_only: true,
    },
    RouteEntry {
        name: RouteName::ApproveTalent,
        path: "/admin/talents/profile/:id/approve/",
        admin_only: true,
    },
    RouteEntry {
        name: RouteName::RejectTalent,
        path: "/admin/talents/profile/:id/reject/",
        admin_only: true,
    },
    RouteEntry {
        name: RouteName::AdminCollaborationChangelist,
        path: "/admin/talents/collaboration/",
        admin_only: true,
    },
];

pub fn entry(name: RouteName) -> &'static RouteEntry {
    // every RouteName has exactly one entry
    ROUTES
        .iter()
        .find(|entry| entry.name == name)
        .unwrap_or(&ROUTES[0])
}

pub fn path(name: RouteName) -> &'static str {
    entry(name).path
}

/// Concrete URL for a route, substituting the profile id where the path takes one.
pub fn reverse(name: RouteName, id: Option<ProfileId>) -> String {
    let template = path(name);
    match id {
        Some(id) => template.replace(":id", &id.to_string()),
        None => template.to_string(),
    }
}
