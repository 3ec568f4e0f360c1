use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        mail::{SendConfirmationRequest, VerifyOtpRequest},
        orders::{
            CreateOrderRequest, OrderCreated, OrderLineRequest, OrderStatusRequest,
            OrderStatusResponse, OrderTracking, TrackOrderRequest, TrackedItem, WebhookEvent,
            WebhookOrder, WebhookPayment,
        },
        products::{CreateProductRequest, ProductList, ProductView, UpdateProductRequest},
        tickets::{
            AddMessageRequest, CreateTicketRequest, TicketList, TicketWithMessages,
            UpdateTicketStatusRequest,
        },
    },
    middleware::auth::ADMIN_PASSWORD_HEADER,
    models::{Order, OrderItem, Product, Ticket, TicketMessage},
    pricing::{AttributeEntry, ProductAttributes},
    response::{ApiResponse, ErrorDetail, Meta},
    routes::{health, mail, orders, params, products, tickets},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_password",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_PASSWORD_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        orders::create_order,
        orders::verify_order,
        orders::track_order,
        orders::payment_webhook,
        mail::send_confirmation,
        mail::verify,
        tickets::create_ticket,
        tickets::get_ticket,
        tickets::add_message,
        tickets::reply,
        tickets::list_tickets,
        tickets::update_status,
    ),
    components(
        schemas(
            Product,
            Order,
            OrderItem,
            Ticket,
            TicketMessage,
            AttributeEntry,
            ProductAttributes,
            CreateProductRequest,
            UpdateProductRequest,
            ProductView,
            ProductList,
            CreateOrderRequest,
            OrderLineRequest,
            OrderCreated,
            OrderStatusRequest,
            OrderStatusResponse,
            TrackOrderRequest,
            TrackedItem,
            OrderTracking,
            WebhookEvent,
            WebhookOrder,
            WebhookPayment,
            SendConfirmationRequest,
            VerifyOtpRequest,
            CreateTicketRequest,
            AddMessageRequest,
            UpdateTicketStatusRequest,
            TicketWithMessages,
            TicketList,
            params::Pagination,
            params::ProductQuery,
            params::TicketListQuery,
            Meta,
            ErrorDetail,
            ApiResponse<ProductView>,
            ApiResponse<ProductList>,
            ApiResponse<OrderCreated>,
            ApiResponse<OrderStatusResponse>,
            ApiResponse<OrderTracking>,
            ApiResponse<TicketWithMessages>,
            ApiResponse<TicketList>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Orders", description = "Checkout, tracking and webhook endpoints"),
        (name = "Mail", description = "Email confirmation endpoints"),
        (name = "Tickets", description = "Support ticket endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
