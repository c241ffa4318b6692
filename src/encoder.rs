use crate::options::{GenerationRequest, Strategy};

pub const DEFAULT_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Builds the GET URL asking `endpoint` to render `request`.
///
/// The text is percent-encoded, colors lose their `#`, and the size is sent as `WxW`.
/// Under [`Strategy::Composite`] the remote margin is zero since padding is drawn locally.
pub fn request_url(endpoint: &str, request: &GenerationRequest, strategy: Strategy) -> String {
    let options = request.options();
    let separator = if endpoint.contains('?') { '&' } else { '?' };

    format!(
        "{endpoint}{separator}data={data}&size={size}x{size}&color={color}&bgcolor={bgcolor}&ecc={ecc}&margin={margin}",
        data = urlencoding::encode(request.text()),
        size = options.size,
        color = options.foreground.query_value(),
        bgcolor = options.background.query_value(),
        ecc = options.ec_level.code(),
        margin = strategy.remote_margin(request),
    )
}
