//! GraphQL query definitions for the Printavo API.
//!
//! Each query implements `graphql_client::GraphQLQuery` by hand: the document
//! is a constant and the variable/response types mirror its selection set.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

// =============================================================================
// Shared node shapes
// =============================================================================

/// A GraphQL connection (`{ edges { node } }`).
///
/// A null connection or null edge list both mean "no results".
#[derive(Debug, Clone, Deserialize)]
pub struct Connection<T> {
    pub edges: Option<Vec<Edge<T>>>,
}

/// One edge of a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

impl<T> Connection<T> {
    /// Consume the connection, yielding its nodes in upstream order.
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.unwrap_or_default().into_iter().map(|e| e.node)
    }
}

/// Status selection (`status { id name color }`).
#[derive(Debug, Clone, Deserialize)]
pub struct StatusNode {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Order total as sent by Printavo: a JSON string or number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTotal {
    Number(serde_json::Number),
    Text(String),
}

// =============================================================================
// SearchOrders
// =============================================================================

pub struct SearchOrders;

pub mod search_orders {
    use super::{Connection, Deserialize, RawTotal, Serialize, StatusNode};

    pub const OPERATION_NAME: &str = "SearchOrders";
    pub const QUERY: &str = r"
query SearchOrders($query: String!, $first: Int!) {
  orders(first: $first, query: $query) {
    edges {
      node {
        id
        name
        visualId
        createdAt
        updatedAt
        dueDate
        status {
          id
          name
          color
        }
        customer {
          id
          name
          email
        }
        total
      }
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub query: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub orders: Option<Connection<OrderNode>>,
    }

    /// Order node from the `orders` root field.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderNode {
        pub id: String,
        pub name: Option<String>,
        pub visual_id: String,
        pub created_at: String,
        pub updated_at: Option<String>,
        pub due_date: Option<String>,
        pub status: StatusNode,
        pub customer: CustomerNode,
        #[serde(default)]
        pub total: Option<RawTotal>,
    }

    /// Customer selection on listed orders.
    #[derive(Debug, Clone, Deserialize)]
    pub struct CustomerNode {
        pub id: String,
        pub name: Option<String>,
        pub email: Option<String>,
    }
}

impl GraphQLQuery for SearchOrders {
    type Variables = search_orders::Variables;
    type ResponseData = search_orders::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: search_orders::QUERY,
            operation_name: search_orders::OPERATION_NAME,
        }
    }
}

// =============================================================================
// GetOrderByVisualId
// =============================================================================

pub struct GetOrderByVisualId;

pub mod get_order_by_visual_id {
    use super::{Connection, Deserialize, RawTotal, Serialize, StatusNode};

    pub const OPERATION_NAME: &str = "GetOrderByVisualId";
    pub const QUERY: &str = r"
query GetOrderByVisualId($query: String!) {
  invoices(query: $query, first: 1) {
    edges {
      node {
        id
        name
        visualId
        createdAt
        updatedAt
        total
        status {
          id
          name
          color
        }
        contact {
          id
          fullName
          email
        }
      }
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub query: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub invoices: Option<Connection<InvoiceNode>>,
    }

    /// Invoice node from the `invoices` root field.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InvoiceNode {
        pub id: String,
        pub name: Option<String>,
        pub visual_id: String,
        pub created_at: String,
        pub updated_at: Option<String>,
        #[serde(default)]
        pub total: Option<RawTotal>,
        pub status: StatusNode,
        pub contact: ContactNode,
    }

    /// Contact selection on invoices (`fullName` rather than `name`).
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ContactNode {
        pub id: String,
        pub full_name: Option<String>,
        pub email: Option<String>,
    }
}

impl GraphQLQuery for GetOrderByVisualId {
    type Variables = get_order_by_visual_id::Variables;
    type ResponseData = get_order_by_visual_id::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_order_by_visual_id::QUERY,
            operation_name: get_order_by_visual_id::OPERATION_NAME,
        }
    }
}

// =============================================================================
// GetStatuses
// =============================================================================

pub struct GetStatuses;

pub mod get_statuses {
    use super::{Connection, Deserialize, Serialize, StatusNode};

    pub const OPERATION_NAME: &str = "GetStatuses";
    pub const QUERY: &str = r"
query GetStatuses {
  statuses {
    edges {
      node {
        id
        name
        color
      }
    }
  }
}
";

    /// `GetStatuses` takes no variables; serializes as `{}`.
    #[derive(Debug, Clone, Copy, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub statuses: Option<Connection<StatusNode>>,
    }
}

impl GraphQLQuery for GetStatuses {
    type Variables = get_statuses::Variables;
    type ResponseData = get_statuses::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_statuses::QUERY,
            operation_name: get_statuses::OPERATION_NAME,
        }
    }
}
