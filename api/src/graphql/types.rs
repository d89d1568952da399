//! GraphQL object, enum and input types of the listing service

use chrono::{DateTime, Utc};
use juniper::{FieldResult, GraphQLEnum, GraphQLInputObject, GraphQLObject};
use tracing::warn;
use uuid::Uuid;

use eh_core::domain::entities::{
    Listing, ListingCategory, ListingPhoto, ListingStatus, ListingType, Report, ReportReason,
    ReportStatus,
};
use eh_core::domain::value_objects::{self, Dashboard, ListingSort, UserSummary};
use eh_core::services::SubmitReport;
use eh_shared::PaginatedResponse;

use super::context::GraphQLContext;
use super::errors::IntoFieldResult;
use crate::dto::photo_url;

/// GraphQL has no 64-bit integer; counters saturate instead of wrapping
pub(crate) fn clamp_i32<T: TryInto<i32>>(value: T) -> i32 {
    value.try_into().unwrap_or(i32::MAX)
}

/// Mirror a domain enum as a GraphQL enum, converting both ways
macro_rules! graphql_enum {
    ($(#[$meta:meta])* $name:ident => $domain:ident { $($variant:ident),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, GraphQLEnum)]
        $(#[$meta])*
        pub enum $name {
            $($variant),+
        }

        impl From<$domain> for $name {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => $name::$variant),+
                }
            }
        }

        impl From<$name> for $domain {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $domain::$variant),+
                }
            }
        }
    };
}

graphql_enum!(
    #[graphql(name = "ListingType")]
    ListingTypeValue => ListingType { Sale, Rent }
);

graphql_enum!(
    #[graphql(name = "ListingCategory")]
    ListingCategoryValue => ListingCategory { Apartment, House, Land, Commercial, Room }
);

graphql_enum!(
    #[graphql(name = "ListingStatus")]
    ListingStatusValue => ListingStatus { Draft, Published, Archived }
);

graphql_enum!(
    #[graphql(name = "ListingSort")]
    ListingSortValue => ListingSort { Newest, PriceAsc, PriceDesc, MostLiked }
);

graphql_enum!(
    #[graphql(name = "ReportReason")]
    ReportReasonValue => ReportReason {
        Spam,
        Fraud,
        Inappropriate,
        WrongInformation,
        Duplicate,
        Other,
    }
);

graphql_enum!(
    #[graphql(name = "ReportStatus")]
    ReportStatusValue => ReportStatus { Pending, UnderReview, Resolved, Dismissed, Closed }
);

/// Public profile of a listing owner
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "User")]
pub struct UserNode {
    pub id: Uuid,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserSummary> for UserNode {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

pub struct ListingNode(pub Listing);

#[juniper::graphql_object(context = GraphQLContext, name = "Listing")]
impl ListingNode {
    fn id(&self) -> Uuid {
        self.0.id
    }

    fn owner_id(&self) -> Uuid {
        self.0.owner_id
    }

    fn title(&self) -> &str {
        &self.0.title
    }

    fn description(&self) -> &str {
        &self.0.description
    }

    fn listing_type(&self) -> ListingTypeValue {
        self.0.listing_type.into()
    }

    fn category(&self) -> ListingCategoryValue {
        self.0.category.into()
    }

    fn status(&self) -> ListingStatusValue {
        self.0.status.into()
    }

    fn price(&self) -> f64 {
        self.0.price
    }

    fn currency(&self) -> &str {
        &self.0.currency
    }

    fn area_sqm(&self) -> Option<f64> {
        self.0.area_sqm
    }

    fn rooms(&self) -> Option<i32> {
        self.0.rooms
    }

    fn address(&self) -> Option<&str> {
        self.0.address.as_deref()
    }

    fn city(&self) -> &str {
        &self.0.city
    }

    fn country(&self) -> &str {
        &self.0.country
    }

    fn latitude(&self) -> Option<f64> {
        self.0.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.0.longitude
    }

    fn likes_count(&self) -> i32 {
        clamp_i32(self.0.likes_count)
    }

    /// Pass back as `expectedVersion` on update
    fn version(&self) -> i32 {
        clamp_i32(self.0.row_version)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.0.published_at
    }

    /// Owner profile; null for anonymous callers or when the authorization
    /// service cannot be reached
    async fn owner(&self, ctx: &GraphQLContext) -> Option<UserNode> {
        let token = ctx.auth.as_ref()?.token.as_str();
        match ctx.state.user_directory.find_user(self.0.owner_id, token).await {
            Ok(user) => user.map(UserNode::from),
            Err(e) => {
                warn!(owner_id = %self.0.owner_id, error = %e, "Owner lookup failed");
                None
            }
        }
    }

    async fn photos(&self, ctx: &GraphQLContext) -> FieldResult<Vec<PhotoNode>> {
        let photos = ctx
            .state
            .photo_service
            .list_photos(self.0.id, ctx.viewer())
            .await
            .into_field_result()?;
        Ok(photos.into_iter().map(PhotoNode).collect())
    }

    async fn liked_by_me(&self, ctx: &GraphQLContext) -> FieldResult<bool> {
        match ctx.viewer() {
            Some(actor) => ctx
                .state
                .listing_service
                .is_liked(actor, self.0.id)
                .await
                .into_field_result(),
            None => Ok(false),
        }
    }
}

pub struct PhotoNode(pub ListingPhoto);

#[juniper::graphql_object(context = GraphQLContext, name = "Photo")]
impl PhotoNode {
    fn id(&self) -> Uuid {
        self.0.id
    }

    fn listing_id(&self) -> Uuid {
        self.0.listing_id
    }

    fn file_name(&self) -> &str {
        &self.0.file_name
    }

    fn content_type(&self) -> &str {
        &self.0.content_type
    }

    fn size_bytes(&self) -> i32 {
        clamp_i32(self.0.size_bytes)
    }

    fn position(&self) -> i32 {
        self.0.position
    }

    fn is_primary(&self) -> bool {
        self.0.is_primary
    }

    /// Where the bytes are served
    fn url(&self) -> String {
        photo_url(self.0.id)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }
}

pub struct ReportNode(pub Report);

#[juniper::graphql_object(context = GraphQLContext, name = "Report")]
impl ReportNode {
    fn id(&self) -> Uuid {
        self.0.id
    }

    fn listing_id(&self) -> Uuid {
        self.0.listing_id
    }

    fn reporter_id(&self) -> Uuid {
        self.0.reporter_id
    }

    fn reason(&self) -> ReportReasonValue {
        self.0.reason.into()
    }

    fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    fn status(&self) -> ReportStatusValue {
        self.0.status.into()
    }

    fn moderator_id(&self) -> Option<Uuid> {
        self.0.moderator_id
    }

    fn resolution_note(&self) -> Option<&str> {
        self.0.resolution_note.as_deref()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.0.resolved_at
    }

    fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.0.closed_at
    }

    /// The reported listing, when the caller may still see it
    async fn listing(&self, ctx: &GraphQLContext) -> Option<ListingNode> {
        ctx.state
            .listing_service
            .get_listing(self.0.listing_id, ctx.viewer())
            .await
            .ok()
            .map(ListingNode)
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct PageInfo {
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
    pub total_pages: i32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageInfo {
    fn of<T>(page: &PaginatedResponse<T>) -> Self {
        Self {
            page: clamp_i32(page.page),
            per_page: clamp_i32(page.per_page),
            total: clamp_i32(page.total),
            total_pages: clamp_i32(page.total_pages),
            has_next: page.has_next.unwrap_or(false),
            has_prev: page.has_prev.unwrap_or(false),
        }
    }
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct ListingPage {
    pub items: Vec<ListingNode>,
    pub page_info: PageInfo,
}

impl From<PaginatedResponse<Listing>> for ListingPage {
    fn from(page: PaginatedResponse<Listing>) -> Self {
        let page_info = PageInfo::of(&page);
        Self {
            items: page.data.into_iter().map(ListingNode).collect(),
            page_info,
        }
    }
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct ReportPage {
    pub items: Vec<ReportNode>,
    pub page_info: PageInfo,
}

impl From<PaginatedResponse<Report>> for ReportPage {
    fn from(page: PaginatedResponse<Report>) -> Self {
        let page_info = PageInfo::of(&page);
        Self {
            items: page.data.into_iter().map(ReportNode).collect(),
            page_info,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ListingCounts {
    pub draft: i32,
    pub published: i32,
    pub archived: i32,
    pub total: i32,
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct ReportCounts {
    pub pending: i32,
    pub under_review: i32,
    pub resolved: i32,
    pub dismissed: i32,
    pub closed: i32,
    pub open: i32,
}

#[derive(GraphQLObject)]
#[graphql(context = GraphQLContext)]
pub struct DashboardNode {
    pub listings: ListingCounts,
    pub reports: ReportCounts,
    /// Null when the authorization service could not be reached
    pub total_users: Option<i32>,
    pub listings_last_7_days: i32,
    pub listings_last_30_days: i32,
    pub top_liked: Vec<ListingNode>,
}

impl From<Dashboard> for DashboardNode {
    fn from(dashboard: Dashboard) -> Self {
        let listings = &dashboard.listings;
        let reports = &dashboard.reports;
        Self {
            listings: ListingCounts {
                draft: clamp_i32(listings.draft),
                published: clamp_i32(listings.published),
                archived: clamp_i32(listings.archived),
                total: clamp_i32(listings.total()),
            },
            reports: ReportCounts {
                pending: clamp_i32(reports.pending),
                under_review: clamp_i32(reports.under_review),
                resolved: clamp_i32(reports.resolved),
                dismissed: clamp_i32(reports.dismissed),
                closed: clamp_i32(reports.closed),
                open: clamp_i32(reports.open()),
            },
            total_users: dashboard.total_users.map(clamp_i32),
            listings_last_7_days: clamp_i32(dashboard.listings_last_7_days),
            listings_last_30_days: clamp_i32(dashboard.listings_last_30_days),
            top_liked: dashboard.top_liked.into_iter().map(ListingNode).collect(),
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
#[graphql(name = "ListingInput")]
pub struct ListingInputValue {
    pub title: String,
    pub description: Option<String>,
    pub listing_type: ListingTypeValue,
    pub category: ListingCategoryValue,
    pub price: f64,
    pub currency: Option<String>,
    pub area_sqm: Option<f64>,
    pub rooms: Option<i32>,
    pub address: Option<String>,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<ListingInputValue> for value_objects::ListingInput {
    fn from(input: ListingInputValue) -> Self {
        Self {
            title: input.title,
            description: input.description.unwrap_or_default(),
            listing_type: input.listing_type.into(),
            category: input.category.into(),
            price: input.price,
            currency: input.currency,
            area_sqm: input.area_sqm,
            rooms: input.rooms,
            address: input.address,
            city: input.city,
            country: input.country,
            latitude: input.latitude,
            longitude: input.longitude,
        }
    }
}

/// Omitted fields stay unchanged
#[derive(Debug, Clone, Default, GraphQLInputObject)]
#[graphql(name = "ListingPatch")]
pub struct ListingPatchValue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub listing_type: Option<ListingTypeValue>,
    pub category: Option<ListingCategoryValue>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub area_sqm: Option<f64>,
    pub rooms: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<ListingPatchValue> for value_objects::ListingPatch {
    fn from(patch: ListingPatchValue) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            listing_type: patch.listing_type.map(Into::into),
            category: patch.category.map(Into::into),
            price: patch.price,
            currency: patch.currency,
            area_sqm: patch.area_sqm,
            rooms: patch.rooms,
            address: patch.address,
            city: patch.city,
            country: patch.country,
            latitude: patch.latitude,
            longitude: patch.longitude,
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
#[graphql(name = "ListingFilter")]
pub struct ListingFilterValue {
    pub text: Option<String>,
    pub listing_type: Option<ListingTypeValue>,
    pub category: Option<ListingCategoryValue>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rooms: Option<i32>,
    /// Honoured for admins only; everybody else searches published listings
    pub status: Option<ListingStatusValue>,
    pub owner_id: Option<Uuid>,
    pub sort: Option<ListingSortValue>,
}

impl From<ListingFilterValue> for value_objects::ListingFilter {
    fn from(filter: ListingFilterValue) -> Self {
        Self {
            text: filter.text,
            listing_type: filter.listing_type.map(Into::into),
            category: filter.category.map(Into::into),
            city: filter.city,
            min_price: filter.min_price,
            max_price: filter.max_price,
            min_rooms: filter.min_rooms,
            status: filter.status.map(Into::into),
            owner_id: filter.owner_id,
            sort: filter.sort.map(Into::into).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
#[graphql(name = "ReportFilter")]
pub struct ReportFilterValue {
    pub status: Option<ReportStatusValue>,
    pub listing_id: Option<Uuid>,
    pub reason: Option<ReportReasonValue>,
}

impl From<ReportFilterValue> for value_objects::ReportFilter {
    fn from(filter: ReportFilterValue) -> Self {
        Self {
            status: filter.status.map(Into::into),
            listing_id: filter.listing_id,
            reason: filter.reason.map(Into::into),
            reporter_id: None,
        }
    }
}

#[derive(Debug, Clone, GraphQLInputObject)]
pub struct SubmitReportInput {
    pub listing_id: Uuid,
    pub reason: ReportReasonValue,
    pub description: Option<String>,
}

impl From<SubmitReportInput> for SubmitReport {
    fn from(input: SubmitReportInput) -> Self {
        Self {
            listing_id: input.listing_id,
            reason: input.reason.into(),
            description: input.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eh_core::domain::value_objects::ListingFilter;

    #[test]
    fn test_enum_mirrors_cover_every_variant() {
        for status in ListingStatus::ALL {
            let mirrored = ListingStatusValue::from(*status);
            assert_eq!(ListingStatus::from(mirrored), *status);
        }
        for reason in ReportReason::ALL {
            let mirrored = ReportReasonValue::from(*reason);
            assert_eq!(ReportReason::from(mirrored), *reason);
        }
    }

    #[test]
    fn test_filter_defaults_to_newest() {
        let filter = ListingFilter::from(ListingFilterValue {
            city: Some("Porto".to_string()),
            ..Default::default()
        });
        assert_eq!(filter.sort, ListingSort::Newest);
        assert_eq!(filter.city.as_deref(), Some("Porto"));
        assert!(filter.status.is_none());
    }

    #[test]
    fn test_clamp_i32() {
        assert_eq!(clamp_i32(7_i64), 7);
        assert_eq!(clamp_i32(u64::MAX), i32::MAX);
    }
}
