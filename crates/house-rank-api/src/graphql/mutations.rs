use async_graphql::{Context, Object, Result};

use crate::auth::RequestContext;
use crate::graphql::types::{House, HouseList, User};
use crate::AppState;

pub struct Mutation;

/// Owner-or-edit-member gate, run before every mutation on an existing
/// list.
async fn require_rw_access(ctx: &Context<'_>, house_list_id: i32) -> Result<()> {
    let state = ctx.data::<AppState>()?;
    let request = ctx.data::<RequestContext>()?;
    let allowed = state
        .storage
        .has_house_list_access_rw(house_list_id, request.user.id)
        .await?;
    if !allowed {
        return Err(format!(
            "User {} does not have edit access to HouseList {}",
            request.user.id, house_list_id
        )
        .into());
    }
    Ok(())
}

#[Object]
impl Mutation {
    async fn create_house_list(&self, ctx: &Context<'_>, name: String) -> Result<HouseList> {
        let state = ctx.data::<AppState>()?;
        let request = ctx.data::<RequestContext>()?;
        let list = state
            .storage
            .create_house_list(&name, request.user.id)
            .await?;
        Ok(HouseList(list))
    }

    async fn delete_house_list(&self, ctx: &Context<'_>, list_id: i32) -> Result<HouseList> {
        require_rw_access(ctx, list_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(HouseList(state.storage.delete_house_list(list_id).await?))
    }

    async fn add_house_to_list(
        &self,
        ctx: &Context<'_>,
        zpid: String,
        list_id: i32,
    ) -> Result<House> {
        require_rw_access(ctx, list_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(House(state.storage.add_house_to_list(&zpid, list_id).await?))
    }

    async fn remove_house_from_list(
        &self,
        ctx: &Context<'_>,
        zpid: String,
        list_id: i32,
    ) -> Result<House> {
        require_rw_access(ctx, list_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(House(
            state.storage.remove_house_from_list(&zpid, list_id).await?,
        ))
    }

    async fn add_user_to_list(
        &self,
        ctx: &Context<'_>,
        email: String,
        list_id: i32,
    ) -> Result<User> {
        require_rw_access(ctx, list_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(User(state.storage.add_user_to_list(&email, list_id).await?))
    }

    async fn remove_user_from_list(&self, ctx: &Context<'_>, id: i32, list_id: i32) -> Result<User> {
        require_rw_access(ctx, list_id).await?;
        let state = ctx.data::<AppState>()?;
        Ok(User(state.storage.remove_user_from_list(id, list_id).await?))
    }
}
