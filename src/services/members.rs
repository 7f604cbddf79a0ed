use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::{models::members, repositories::members::MemberRepository};

pub enum MemberRequest {
    Register {
        new: members::NewMember,
        response: oneshot::Sender<Result<members::Member, ServiceError>>,
    },
    GetMember {
        id: String,
        response: oneshot::Sender<Result<members::Member, ServiceError>>,
    },
    JoinClub {
        id: String,
        response: oneshot::Sender<Result<(), ServiceError>>,
    },
}

#[derive(Clone)]
pub struct MemberRequestHandler {
    repository: MemberRepository,
}

impl MemberRequestHandler {
    pub fn new(sql_conn: PgPool) -> Self {
        let repository = MemberRepository::new(sql_conn);

        MemberRequestHandler { repository }
    }

    async fn register(&self, new: members::NewMember) -> Result<members::Member, ServiceError> {
        self.repository
            .insert_member(new)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn get_member(&self, id: &str) -> Result<members::Member, ServiceError> {
        self.repository
            .get_member_by_id(id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?
            .ok_or_else(|| ServiceError::NotFound(format!("member {}", id)))
    }

    async fn join_club(&self, id: &str) -> Result<(), ServiceError> {
        let joined = self
            .repository
            .join_club(id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        if joined {
            Ok(())
        } else {
            Err(ServiceError::NotFound(format!("member {}", id)))
        }
    }
}

#[async_trait]
impl RequestHandler<MemberRequest> for MemberRequestHandler {
    async fn handle_request(&self, request: MemberRequest) {
        match request {
            MemberRequest::Register { new, response } => {
                let member = self.register(new).await;
                let _ = response.send(member);
            }
            MemberRequest::GetMember { id, response } => {
                let member = self.get_member(&id).await;
                let _ = response.send(member);
            }
            MemberRequest::JoinClub { id, response } => {
                let result = self.join_club(&id).await;
                let _ = response.send(result);
            }
        }
    }
}

pub struct MemberService;

impl MemberService {
    pub fn new() -> Self {
        MemberService {}
    }
}

#[async_trait]
impl Service<MemberRequest, MemberRequestHandler> for MemberService {}
