use crate::domain::types::{Actor, Role};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PlanRoute,
    PlanAll,
    ViewRoute,
    MarkStop,
}

impl Action {
    pub fn describe(&self) -> &'static str {
        match self {
            Action::PlanRoute => "plan a collector route",
            Action::PlanAll => "plan every collector route",
            Action::ViewRoute => "view a collector route",
            Action::MarkStop => "update a route stop",
        }
    }
}

/// Collectors act on their own route only; supervisors plan and view any route
/// but leave stop updates to collectors; plain users have no route access.
pub fn authorize(actor: &Actor, action: Action, collector_id: Option<&str>) -> Result<()> {
    let own_route = collector_id == Some(actor.id.as_str());
    let allowed = match (actor.role, action) {
        (Role::User, _) => false,
        (Role::Supervisor, Action::MarkStop) => false,
        (Role::Supervisor, Action::PlanRoute | Action::PlanAll | Action::ViewRoute) => true,
        (Role::Collector, Action::PlanAll) => false,
        (Role::Collector, Action::PlanRoute | Action::ViewRoute | Action::MarkStop) => own_route,
    };

    if allowed {
        Ok(())
    } else {
        Err(Error::Forbidden {
            role: actor.role,
            action: action.describe(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_matrix() {
        let user = Actor::new("u1", Role::User);
        let boss = Actor::supervisor("s1");
        let col = Actor::collector("COL-1");

        for action in [Action::PlanRoute, Action::PlanAll, Action::ViewRoute, Action::MarkStop] {
            assert!(authorize(&user, action, Some("COL-1")).is_err());
        }

        assert!(authorize(&boss, Action::PlanRoute, Some("COL-1")).is_ok());
        assert!(authorize(&boss, Action::PlanAll, None).is_ok());
        assert!(authorize(&boss, Action::ViewRoute, Some("COL-2")).is_ok());
        assert!(authorize(&boss, Action::MarkStop, Some("COL-1")).is_err());

        assert!(authorize(&col, Action::PlanRoute, Some("COL-1")).is_ok());
        assert!(authorize(&col, Action::ViewRoute, Some("COL-1")).is_ok());
        assert!(authorize(&col, Action::MarkStop, Some("COL-1")).is_ok());
        assert!(authorize(&col, Action::ViewRoute, Some("COL-2")).is_err());
        assert!(authorize(&col, Action::MarkStop, Some("COL-2")).is_err());
        assert!(authorize(&col, Action::PlanAll, None).is_err());
    }

    #[test]
    fn forbidden_names_role_and_action() {
        let err = authorize(&Actor::new("u1", Role::User), Action::ViewRoute, Some("COL-1"))
            .unwrap_err();
        assert_eq!(err.to_string(), "user is not allowed to view a collector route");
    }
}
