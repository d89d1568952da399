//! Query and mutation roots of the listing service

use juniper::{EmptySubscription, FieldResult, RootNode};
use uuid::Uuid;

use eh_core::services::DEFAULT_TOP_LIKED;
use eh_shared::Pagination;

use super::context::GraphQLContext;
use super::errors::IntoFieldResult;
use super::types::{
    DashboardNode, ListingFilterValue, ListingInputValue, ListingNode, ListingPage,
    ListingPatchValue, ListingStatusValue, PhotoNode, ReportFilterValue, ReportNode, ReportPage,
    SubmitReportInput,
};

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// A single listing; drafts and archived listings only for their owner
    async fn listing(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ListingNode> {
        ctx.state
            .listing_service
            .get_listing(id, ctx.viewer())
            .await
            .map(ListingNode)
            .into_field_result()
    }

    /// Search listings, published only unless the caller is an admin
    async fn listings(
        ctx: &GraphQLContext,
        filter: Option<ListingFilterValue>,
        page: Option<i32>,
        per_page: Option<i32>,
    ) -> FieldResult<ListingPage> {
        let pagination = Pagination::from_options(page, per_page);
        ctx.state
            .listing_service
            .search_listings(ctx.viewer(), filter.unwrap_or_default().into(), &pagination)
            .await
            .map(ListingPage::from)
            .into_field_result()
    }

    async fn my_listings(
        ctx: &GraphQLContext,
        status: Option<ListingStatusValue>,
        page: Option<i32>,
        per_page: Option<i32>,
    ) -> FieldResult<ListingPage> {
        let actor = ctx.actor()?;
        let pagination = Pagination::from_options(page, per_page);
        ctx.state
            .listing_service
            .my_listings(actor, status.map(Into::into), &pagination)
            .await
            .map(ListingPage::from)
            .into_field_result()
    }

    async fn liked_listings(
        ctx: &GraphQLContext,
        page: Option<i32>,
        per_page: Option<i32>,
    ) -> FieldResult<ListingPage> {
        let actor = ctx.actor()?;
        let pagination = Pagination::from_options(page, per_page);
        ctx.state
            .listing_service
            .liked_listings(actor, &pagination)
            .await
            .map(ListingPage::from)
            .into_field_result()
    }

    /// Photos of a listing, primary first
    async fn photos(ctx: &GraphQLContext, listing_id: Uuid) -> FieldResult<Vec<PhotoNode>> {
        let photos = ctx
            .state
            .photo_service
            .list_photos(listing_id, ctx.viewer())
            .await
            .into_field_result()?;
        Ok(photos.into_iter().map(PhotoNode).collect())
    }

    /// A report, for admins and its reporter
    async fn report(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ReportNode> {
        let actor = ctx.actor()?;
        ctx.state
            .report_service
            .get_report(actor, id)
            .await
            .map(ReportNode)
            .into_field_result()
    }

    /// Moderation queue (Admin)
    async fn reports(
        ctx: &GraphQLContext,
        filter: Option<ReportFilterValue>,
        page: Option<i32>,
        per_page: Option<i32>,
    ) -> FieldResult<ReportPage> {
        let actor = ctx.actor()?;
        let pagination = Pagination::from_options(page, per_page);
        ctx.state
            .report_service
            .list_reports(actor, filter.unwrap_or_default().into(), &pagination)
            .await
            .map(ReportPage::from)
            .into_field_result()
    }

    async fn my_reports(
        ctx: &GraphQLContext,
        page: Option<i32>,
        per_page: Option<i32>,
    ) -> FieldResult<ReportPage> {
        let actor = ctx.actor()?;
        let pagination = Pagination::from_options(page, per_page);
        ctx.state
            .report_service
            .my_reports(actor, &pagination)
            .await
            .map(ReportPage::from)
            .into_field_result()
    }

    /// Admin dashboard figures
    async fn dashboard(ctx: &GraphQLContext, top_liked: Option<i32>) -> FieldResult<DashboardNode> {
        let actor = ctx.actor()?;
        let token = ctx.access_token()?;
        let top_liked = top_liked
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_TOP_LIKED);
        ctx.state
            .analytics_service
            .dashboard(actor, token, top_liked)
            .await
            .map(DashboardNode::from)
            .into_field_result()
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    /// New listings start as drafts
    async fn create_listing(ctx: &GraphQLContext, input: ListingInputValue) -> FieldResult<ListingNode> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .create_listing(actor, input.into())
            .await
            .map(ListingNode)
            .into_field_result()
    }

    /// Fails with `CONCURRENCY_CONFLICT` when `expectedVersion` is stale
    async fn update_listing(
        ctx: &GraphQLContext,
        id: Uuid,
        patch: ListingPatchValue,
        expected_version: i32,
    ) -> FieldResult<ListingNode> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .update_listing(actor, id, patch.into(), i64::from(expected_version))
            .await
            .map(ListingNode)
            .into_field_result()
    }

    async fn publish_listing(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ListingNode> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .publish_listing(actor, id)
            .await
            .map(ListingNode)
            .into_field_result()
    }

    async fn archive_listing(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ListingNode> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .archive_listing(actor, id)
            .await
            .map(ListingNode)
            .into_field_result()
    }

    /// Soft delete; returns the id of the removed listing
    async fn delete_listing(ctx: &GraphQLContext, id: Uuid) -> FieldResult<Uuid> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .delete_listing(actor, id)
            .await
            .into_field_result()?;
        Ok(id)
    }

    async fn like_listing(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ListingNode> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .like_listing(actor, id)
            .await
            .map(ListingNode)
            .into_field_result()
    }

    async fn unlike_listing(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ListingNode> {
        let actor = ctx.actor()?;
        ctx.state
            .listing_service
            .unlike_listing(actor, id)
            .await
            .map(ListingNode)
            .into_field_result()
    }

    async fn set_primary_photo(ctx: &GraphQLContext, photo_id: Uuid) -> FieldResult<PhotoNode> {
        let actor = ctx.actor()?;
        ctx.state
            .photo_service
            .set_primary_photo(actor, photo_id)
            .await
            .map(PhotoNode)
            .into_field_result()
    }

    async fn delete_photo(ctx: &GraphQLContext, photo_id: Uuid) -> FieldResult<Uuid> {
        let actor = ctx.actor()?;
        ctx.state
            .photo_service
            .delete_photo(actor, photo_id)
            .await
            .into_field_result()?;
        Ok(photo_id)
    }

    async fn submit_report(ctx: &GraphQLContext, input: SubmitReportInput) -> FieldResult<ReportNode> {
        let actor = ctx.actor()?;
        ctx.state
            .report_service
            .submit_report(actor, input.into())
            .await
            .map(ReportNode)
            .into_field_result()
    }

    async fn start_review(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ReportNode> {
        let actor = ctx.actor()?;
        ctx.state
            .report_service
            .start_review(actor, id)
            .await
            .map(ReportNode)
            .into_field_result()
    }

    /// Resolve a report; `archiveListing` also takes the listing offline
    async fn resolve_report(
        ctx: &GraphQLContext,
        id: Uuid,
        note: Option<String>,
        archive_listing: Option<bool>,
    ) -> FieldResult<ReportNode> {
        let actor = ctx.actor()?;
        ctx.state
            .report_service
            .resolve_report(actor, id, note, archive_listing.unwrap_or(false))
            .await
            .map(ReportNode)
            .into_field_result()
    }

    async fn dismiss_report(
        ctx: &GraphQLContext,
        id: Uuid,
        note: Option<String>,
    ) -> FieldResult<ReportNode> {
        let actor = ctx.actor()?;
        ctx.state
            .report_service
            .dismiss_report(actor, id, note)
            .await
            .map(ReportNode)
            .into_field_result()
    }

    async fn close_report(ctx: &GraphQLContext, id: Uuid) -> FieldResult<ReportNode> {
        let actor = ctx.actor()?;
        ctx.state
            .report_service
            .close_report(actor, id)
            .await
            .map(ReportNode)
            .into_field_result()
    }
}
