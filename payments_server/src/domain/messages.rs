// Client-facing messages. Every envelope message comes from this list.

// Accounts
pub const CREATE_USER_SUCCESS: &str = "User created successfully.";
pub const UPDATE_USER_SUCCESS: &str = "User updated successfully.";
pub const DELETE_USER_SUCCESS: &str = "User deleted successfully.";
pub const GET_USER_SUCCESS: &str = "User retrieved successfully.";
pub const USER_DOES_NOT_EXIST: &str = "User does not exist.";
pub const CREATE_USER_FAIL: &str =
    "Something went wrong could not create user,please contact site maintainer.";
pub const UPDATE_USER_FAIL: &str =
    "Something went wrong could not update user,please contact site maintainer.";
pub const DELETE_USER_FAIL: &str =
    "Something went wrong could not delete user,please contact site maintainer.";
pub const GET_USER_FAIL: &str =
    "Something went wrong could not retrieve user,please contact site maintainer.";
pub const INVALID_USERNAME: &str = "Enter a valid username.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

// Payment intents and refunds
pub const CREATE_PAYMENT_INTENT_SUCCESS: &str = "Payment intent created successfully.";
pub const CREATE_PAYMENT_REFUND_SUCCESS: &str = "Payment is refunded successfully.";
pub const PAYMENT_ALREADY_REFUND: &str = "Payment is already refunded.";
pub const CANCEL_PAYMENT_INTENT_SUCCESS: &str = "Payment intent is canceled successfully.";
pub const CREATE_PAYMENT_INTENT_FAIL: &str =
    "Something went wrong could not create Payment intent.";
pub const CREATE_PAYMENT_REFUND_FAIL: &str =
    "Something went wrong could not create Payment refund.";
pub const CANCEL_PAYMENT_INTENT_FAIL: &str =
    "Something went wrong could not cancel Payment intent.";

// Cards
pub const MISSING_CUSTOMER_ID: &str =
    "User does not have any customer_id,please contact site maintainer.";
pub const GET_ALL_CARD_SUCCESS: &str = "All cards retrieved successfully.";
pub const GET_ALL_CARD_FAIL: &str =
    "Something went wrong could not get list of all card,please contact site maintainer.";
pub const CREATE_CARD_SUCCESS: &str = "Card is created successfully.";
pub const CARD_ALREADY_EXIST: &str = "Card with that number is already exist.";
pub const UPDATE_CARD_SUCCESS: &str = "Card is updated successfully.";
pub const DELETE_CARD_SUCCESS: &str = "Card is deleted successfully.";
pub const CREATE_CARD_FAIL: &str =
    "Something went wrong could not create card,please contact site maintainer.";
pub const UPDATE_CARD_FAIL: &str =
    "Something went wrong could not update card,please contact site maintainer.";
pub const DELETE_CARD_FAIL: &str =
    "Something went wrong could not delete card,please contact site maintainer.";
pub const SET_DEFAULT_CARD_SUCCESS: &str = "Set default card successfully.";
pub const SET_DEFAULT_CARD_FAIL: &str =
    "Something went wrong could not set default card,please contact site maintainer.";
pub const DEFAULT_CARD_SUCCESS: &str = "Default card retrieved successfully.";
pub const DEFAULT_CARD_FAIL: &str = "Default card does not retrieved.";

// Transport
pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const MALFORMED_BODY: &str = "Malformed request body.";

// Request parameter names, as they appear in request bodies.
pub const PARAM_PAYMENT_INTENT_ID: &str = "payment_intent";
pub const PARAM_CARD_ID: &str = "card_id";
pub const PARAM_SOURCE_ID: &str = "source_id";
pub const PARAM_NO_COUNT: &str = "no_count";
pub const PARAM_USERNAME: &str = "username";
pub const PARAM_PASSWORD: &str = "password";

// The only templated message: interpolates the parameter name and nothing else.
pub fn missing_param(field: &str) -> String {
    format!("Request is missing required parameter {field}")
}
