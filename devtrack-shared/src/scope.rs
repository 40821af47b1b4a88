/// Access-scoping rules
///
/// This module defines the viewer identity and the pure visibility rules
/// that decide which projects, tasks, and work logs a given user may see
/// or modify. The SQL list queries in the `models` module apply the same
/// rules as WHERE clauses; the predicates here are the single place the
/// rules are written down and unit-tested.
///
/// # Rules
///
/// - **Projects**: a super admin sees all active projects; a developer
///   sees active projects they created or belong to.
/// - **Tasks**: a super admin sees all tasks; a developer sees tasks
///   assigned to them or belonging to a project in their scope.
/// - **Work logs**: a super admin sees all logs; a developer sees only
///   their own.
///
/// Every decision point matches exhaustively on [`Role`] so that adding
/// a role variant is a compile-time concern, not a runtime surprise.
///
/// # Example
///
/// ```
/// use devtrack_shared::models::user::Role;
/// use devtrack_shared::scope::{self, Viewer};
///
/// let viewer = Viewer::new(7, Role::Developer);
///
/// // Member of an active project: visible
/// assert!(scope::project_visible(&viewer, 1, true, true));
///
/// // Neither member nor creator: not visible
/// assert!(!scope::project_visible(&viewer, 1, false, true));
/// ```

use crate::models::user::Role;

/// The acting user, threaded explicitly through every scoping and
/// mutation call so the rules stay pure and independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// User ID of the requester
    pub id: i64,

    /// Global role of the requester
    pub role: Role,
}

impl Viewer {
    /// Creates a viewer identity
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    /// True if the viewer holds the global super admin role
    pub fn is_super_admin(&self) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::Developer => false,
        }
    }
}

/// Whether a project appears in the viewer's project list scope.
///
/// Inactive projects are hidden from everyone here; membership and
/// creatorship only matter for developers.
pub fn project_visible(viewer: &Viewer, created_by: i64, is_member: bool, is_active: bool) -> bool {
    if !is_active {
        return false;
    }
    match viewer.role {
        Role::SuperAdmin => true,
        Role::Developer => is_member || created_by == viewer.id,
    }
}

/// Whether the viewer may open a project's detail page.
///
/// Unlike [`project_visible`] this carries no `is_active` requirement:
/// a creator or member may still open a project that was deactivated.
pub fn can_view_project(viewer: &Viewer, created_by: i64, is_member: bool) -> bool {
    match viewer.role {
        Role::SuperAdmin => true,
        Role::Developer => is_member || created_by == viewer.id,
    }
}

/// Whether a project is a valid choice when creating a work log.
///
/// Deliberately broader than [`project_visible`]: the work-log project
/// picker does not filter on `is_active`. Kept as its own rule rather
/// than merged with the list scope.
pub fn work_log_project_choice(viewer: &Viewer, created_by: i64, is_member: bool) -> bool {
    match viewer.role {
        Role::SuperAdmin => true,
        Role::Developer => is_member || created_by == viewer.id,
    }
}

/// Whether a task appears in the viewer's task scope.
///
/// `project_in_scope` is the result of [`project_visible`] for the
/// task's project.
pub fn task_visible(viewer: &Viewer, assignee_id: i64, project_in_scope: bool) -> bool {
    match viewer.role {
        Role::SuperAdmin => true,
        Role::Developer => assignee_id == viewer.id || project_in_scope,
    }
}

/// Whether a work log appears in the viewer's scope.
pub fn work_log_visible(viewer: &Viewer, owner_id: i64) -> bool {
    match viewer.role {
        Role::SuperAdmin => true,
        Role::Developer => owner_id == viewer.id,
    }
}

/// Whether the viewer may change a task's status.
///
/// Only the task's assignee or a super admin may move a task.
pub fn can_update_task_status(viewer: &Viewer, assignee_id: i64) -> bool {
    match viewer.role {
        Role::SuperAdmin => true,
        Role::Developer => assignee_id == viewer.id,
    }
}
