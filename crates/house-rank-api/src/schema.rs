use async_graphql::{EmptySubscription, Schema};

use crate::graphql::{Mutation, Query};
use crate::AppState;

pub type HouseRankSchema = Schema<Query, Mutation, EmptySubscription>;

pub fn create_schema(state: AppState) -> HouseRankSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(state)
        // Basic safety limits against abusive selections
        .limit_depth(16)
        .limit_complexity(20_000)
        .finish()
}
