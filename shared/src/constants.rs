pub const VERIFY_ORDER_ENDPOINT: &str = "/api/verify-order";
pub const LOG_EVENT_ENDPOINT: &str = "/api/log-event";
pub const HEALTH_CHECK_ENDPOINT: &str = "/api/health_check";

pub const ORDER_NUMBER_REQUIRED_ERROR: &str = "注文IDを入力してください";
pub const ORDER_NUMBER_FORMAT_ERROR: &str = "注文IDの形式が正しくありません";
pub const INVALID_ORDER_ERROR: &str = "無効な注文IDです。発送通知メールを受信後に再度お試しください。";
pub const SERVER_CONFIG_ERROR: &str = "サーバー設定エラーが発生しました";
pub const INTERNAL_SERVER_ERROR: &str = "サーバー内部エラーが発生しました";
pub const NETWORK_ERROR: &str = "通信エラーが発生しました。もう一度お試しください";
pub const INVALID_REQUEST_ERROR: &str = "リクエストの形式が正しくありません";
pub const AUTH_FAILED_ERROR: &str = "認証に失敗しました";
pub const CONTINUE_INTERRUPTED_NOTICE: &str = "画面がリセットされたため続行できませんでした。STARTを押してください";
pub const LOG_SHEET_MISSING_ERROR: &str = "Log sheet missing";

pub const EVENT_ORDER_VERIFIED: &str = "OrderVerified";
pub const EVENT_SPIN_RESULT: &str = "SpinResult";
pub const EVENT_COUPON_COPY: &str = "CouponCopy";

pub const MAX_ORDER_NUMBER_LENGTH: usize = 64;

pub fn rate_limit_message(retry_after_secs: u64) -> String {
    format!("リクエストが多すぎます。{}秒後に再度お試しください", retry_after_secs)
}
