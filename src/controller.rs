//! The CRUD request machine: permission check, one service call, outcome mapping.
//!
//! Each operation runs `permission check -> service call -> outcome` exactly once and
//! keeps nothing between requests. Service `Err`s are not interpreted and propagate
//! as `AppError::Service`.

use crate::authz::{Authorizer, CrudOperation, PermissionSet, Principal};
use crate::error::AppError;
use crate::model::{ListQuery, Mutation, Page, Resource};
use crate::service::SharedService;
use std::sync::Arc;

/// Response categories a CRUD operation can succeed with.
#[derive(Debug, PartialEq)]
pub enum CrudResponse<M> {
    Page(Page<M>),
    Model(M),
    NoContent,
}

pub struct CrudController<M: Resource> {
    service: SharedService<M>,
    authorizer: Authorizer,
    permissions: Arc<PermissionSet>,
}

impl<M: Resource> Clone for CrudController<M> {
    fn clone(&self) -> Self {
        CrudController {
            service: self.service.clone(),
            authorizer: self.authorizer.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

impl<M: Resource> CrudController<M> {
    pub fn new(service: SharedService<M>, authorizer: Authorizer, permissions: PermissionSet) -> Self {
        CrudController {
            service,
            authorizer,
            permissions: Arc::new(permissions),
        }
    }

    async fn authorize(&self, principal: &Principal, op: CrudOperation) -> Result<(), AppError> {
        let permission = self.permissions.for_operation(op);
        self.authorizer.require(principal, permission).await
    }

    pub async fn list(&self, principal: &Principal, query: ListQuery) -> Result<CrudResponse<M>, AppError> {
        self.authorize(principal, CrudOperation::List).await?;
        let page = self.service.list(&query.normalized()).await?;
        Ok(CrudResponse::Page(page))
    }

    pub async fn get(&self, principal: &Principal, id: M::Id) -> Result<CrudResponse<M>, AppError> {
        self.authorize(principal, CrudOperation::Get).await?;
        match self.service.find(&id).await? {
            Some(model) => Ok(CrudResponse::Model(model)),
            None => Err(AppError::NotFound(id.to_string())),
        }
    }

    pub async fn create(&self, principal: &Principal, model: M) -> Result<CrudResponse<M>, AppError> {
        self.authorize(principal, CrudOperation::Create).await?;
        match self.service.create(model).await? {
            Mutation::Applied(created) => Ok(CrudResponse::Model(created)),
            Mutation::Rejected(errors) => Err(AppError::Validation(errors)),
        }
    }

    pub async fn update(&self, principal: &Principal, id: M::Id, model: M) -> Result<CrudResponse<M>, AppError> {
        // Mismatch is rejected ahead of the permission check.
        if model.id() != Some(&id) {
            return Err(AppError::IdentifierMismatch {
                path: id.to_string(),
                body: model.id().map(ToString::to_string).unwrap_or_default(),
            });
        }
        self.authorize(principal, CrudOperation::Update).await?;
        if !self.service.exists(&id).await? {
            return Err(AppError::NotFound(id.to_string()));
        }
        match self.service.edit(model).await? {
            Mutation::Applied(()) => Ok(CrudResponse::NoContent),
            Mutation::Rejected(errors) => Err(AppError::Validation(errors)),
        }
    }

    pub async fn delete(&self, principal: &Principal, id: M::Id) -> Result<CrudResponse<M>, AppError> {
        self.authorize(principal, CrudOperation::Delete).await?;
        let Some(model) = self.service.find(&id).await? else {
            return Err(AppError::NotFound(id.to_string()));
        };
        match self.service.delete(model).await? {
            Mutation::Applied(()) => Ok(CrudResponse::NoContent),
            Mutation::Rejected(errors) => Err(AppError::Validation(errors)),
        }
    }
}
