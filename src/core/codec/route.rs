// Route-marker matching for URL fragments handed to the decoder.
pub const VIEW_MARKER: &str = "#/view?m=";
pub const LEGACY_MARKER: &str = "#menu=";

const VIEW_ROUTE: &str = "#/view";
const PAYLOAD_PARAM: &str = "m";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Route {
    View,
    Legacy,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RouteMatch<'a> {
    pub route: Route,
    /// Raw payload text; `None` when the parameter is absent or empty.
    pub payload: Option<&'a str>,
}

pub(crate) fn match_route(fragment: &str) -> Option<RouteMatch<'_>> {
    if let Some(rest) = fragment.strip_prefix(VIEW_ROUTE) {
        if rest.is_empty() {
            return Some(RouteMatch {
                route: Route::View,
                payload: None,
            });
        }
        let query = rest.strip_prefix('?')?;
        return Some(RouteMatch {
            route: Route::View,
            payload: query_param(query, PAYLOAD_PARAM),
        });
    }
    if let Some(rest) = fragment.strip_prefix(LEGACY_MARKER) {
        let payload = rest.split('&').next().filter(|value| !value.is_empty());
        return Some(RouteMatch {
            route: Route::Legacy,
            payload,
        });
    }
    None
}

// Values are taken verbatim: form-decoding would turn base64 '+' into a space.
fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key == name).then_some(value)
        })
        .filter(|value| !value.is_empty())
}
