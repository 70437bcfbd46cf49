// Who may modify which user record

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::users::models::UpdateUserRequest;

pub const UPDATE_OTHERS_DENIED: &str = "You can only update your own profile";
pub const ROLE_CHANGE_DENIED: &str = "Only administrators can change user roles";
pub const OWN_ROLE_CHANGE_DENIED: &str = "You cannot change your own role";
pub const DELETE_OTHERS_DENIED: &str = "You can only delete your own account";

/// Checks run in order; the first failure wins.
pub fn authorize_update(
    actor: &AuthContext,
    target_id: i32,
    request: &UpdateUserRequest,
) -> Result<(), ApiError> {
    if !actor.is_user(target_id) && !actor.is_admin() {
        return Err(ApiError::Forbidden(UPDATE_OTHERS_DENIED.to_string()));
    }

    if request.changes_role() && !actor.is_admin() {
        return Err(ApiError::Forbidden(ROLE_CHANGE_DENIED.to_string()));
    }

    // Shadowed by the check above: any non-admin role change is already rejected.
    if request.changes_role() && actor.is_user(target_id) && !actor.is_admin() {
        return Err(ApiError::Forbidden(OWN_ROLE_CHANGE_DENIED.to_string()));
    }

    Ok(())
}

pub fn authorize_delete(actor: &AuthContext, target_id: i32) -> Result<(), ApiError> {
    if !actor.is_user(target_id) && !actor.is_admin() {
        return Err(ApiError::Forbidden(DELETE_OTHERS_DENIED.to_string()));
    }

    Ok(())
}
