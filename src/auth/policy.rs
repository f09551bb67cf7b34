//! Authorization and tenant-isolation rules.
//!
//! Every handler consults this module before touching the store, so the
//! rules live in exactly one place instead of being re-derived inline per
//! endpoint. All functions are pure: they look only at the actor identity
//! and the target row's tenant/role, and a denial never has side effects.

use uuid::Uuid;

use crate::database::models::{Role, UserPatch};
use crate::error::ApiError;

/// The authenticated identity performing a request, as established by the
/// auth middleware from a verified token plus a fresh user row.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    pub company_id: Option<Uuid>,
}

/// Tenant scope for list queries: `None` means unscoped (admin sees every
/// tenant), `Some(id)` pins the query to one company. Non-admins without a
/// company cannot list company-scoped collections at all.
pub fn list_scope(actor: &Actor) -> Result<Option<Uuid>, ApiError> {
    if actor.role.is_admin() {
        return Ok(None);
    }
    match actor.company_id {
        Some(company) => Ok(Some(company)),
        None => Err(ApiError::forbidden("Usuário deve estar associado a uma empresa")),
    }
}

/// Read access to a single row owned by `target_company`.
pub fn can_read_scoped(actor: &Actor, target_company: Option<Uuid>) -> Result<(), ApiError> {
    if actor.role.is_admin() {
        return Ok(());
    }
    let own = actor
        .company_id
        .ok_or_else(|| ApiError::forbidden("Usuário deve estar associado a uma empresa"))?;
    if target_company != Some(own) {
        return Err(ApiError::forbidden("Acesso negado a dados de outra empresa"));
    }
    Ok(())
}

/// Mutation of a single row owned by `target_company`.
pub fn can_write_scoped(actor: &Actor, target_company: Option<Uuid>) -> Result<(), ApiError> {
    if actor.role.is_admin() {
        return Ok(());
    }
    let own = actor
        .company_id
        .ok_or_else(|| ApiError::forbidden("Usuário deve estar associado a uma empresa"))?;
    if target_company != Some(own) {
        return Err(ApiError::forbidden("Sem permissão para modificar dados de outra empresa"));
    }
    Ok(())
}

/// Company a company-owned row (developer, team) is created under. Admins
/// may target any company explicitly; everyone else is forced into their
/// own, ignoring whatever the payload claimed.
pub fn resolve_owned_company(actor: &Actor, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
    if actor.role.is_admin() {
        if let Some(company) = requested {
            return Ok(company);
        }
    }
    actor
        .company_id
        .ok_or_else(|| ApiError::forbidden("Usuário deve estar associado a uma empresa"))
}

/// Company a new User belongs to. Admins must name one; a manager's target
/// is always the manager's own company, ignoring the supplied value.
pub fn resolve_new_user_company(actor: &Actor, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
    match actor.role {
        Role::Admin => requested
            .ok_or_else(|| ApiError::bad_request("Admin deve especificar uma empresa para o usuário")),
        Role::Manager => actor
            .company_id
            .ok_or_else(|| ApiError::forbidden("Manager deve estar associado a uma empresa")),
        Role::User => Err(ApiError::forbidden(
            "Acesso negado. Apenas administradores e gerentes têm permissão",
        )),
    }
}

/// A manager can never create an admin account.
pub fn can_create_user_with_role(actor: &Actor, target_role: Role) -> Result<(), ApiError> {
    if !actor.role.is_admin() && target_role.is_admin() {
        return Err(ApiError::forbidden("Managers não podem criar administradores"));
    }
    Ok(())
}

/// Editing an existing user with a partial update.
pub fn can_update_user(
    actor: &Actor,
    target_role: Role,
    target_company: Option<Uuid>,
    patch: &UserPatch,
) -> Result<(), ApiError> {
    if !actor.role.is_admin() {
        let own = actor
            .company_id
            .ok_or_else(|| ApiError::forbidden("Usuário deve estar associado a uma empresa"))?;
        if target_company != Some(own) {
            return Err(ApiError::forbidden("Sem permissão para editar este usuário"));
        }
        if target_role.is_admin() {
            return Err(ApiError::forbidden("Managers não podem editar administradores"));
        }
        if patch.role == Some(Role::Admin) {
            return Err(ApiError::forbidden(
                "Managers não podem promover usuários a administrador",
            ));
        }
        if patch.company_id.is_some() {
            return Err(ApiError::forbidden(
                "Apenas administradores podem alterar a empresa do usuário",
            ));
        }
        if patch.is_active.is_some() {
            return Err(ApiError::forbidden(
                "Apenas administradores podem ativar/desativar usuários",
            ));
        }
    }
    Ok(())
}

/// Deleting a user. Self-deletion is denied before anything else, admins
/// included; a manager may only remove plain users of their own company.
pub fn can_delete_user(
    actor: &Actor,
    target_id: Uuid,
    target_role: Role,
    target_company: Option<Uuid>,
) -> Result<(), ApiError> {
    if actor.user_id == target_id {
        return Err(ApiError::forbidden("Você não pode excluir sua própria conta"));
    }
    if !actor.role.is_admin() {
        let own = actor
            .company_id
            .ok_or_else(|| ApiError::forbidden("Usuário deve estar associado a uma empresa"))?;
        if target_company != Some(own) {
            return Err(ApiError::forbidden("Sem permissão para excluir este usuário"));
        }
        if target_role.is_manager_or_admin() {
            return Err(ApiError::forbidden(
                "Sem permissão para excluir administradores ou gerentes",
            ));
        }
    }
    Ok(())
}
