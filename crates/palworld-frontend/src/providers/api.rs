use yew::prelude::*;

use palworld::api::Api;
use palworld::config::ClientConfig;

/// Create the browser API client with the default configuration: same-origin URLs,
/// credentials included, 10 second timeout and JSON content type.
pub fn create() -> Api {
    Api::browser(ClientConfig::default())
}

#[derive(Properties, PartialEq)]
pub struct ApiProviderProps {
    pub children: Children,
}

/// Owns the one [`Api`] instance of the application and shares it with every page below it.
#[function_component(ApiProvider)]
pub fn api_provider(props: &ApiProviderProps) -> Html {
    let api = use_memo((), |_| create());

    html! {
        <ContextProvider<Api> context={(*api).clone()}>
            {props.children.clone()}
        </ContextProvider<Api>>
    }
}

#[hook]
pub fn use_api() -> Api {
    use_context::<Api>().expect("use_api must be used within an ApiProvider")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_create_uses_browser_defaults() {
        let api = create();
        let config = api.client().config();

        assert!(config.with_credentials);
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert_eq!(config.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(config.root_url, "");
    }

    #[test]
    fn test_shared_handles_are_one_client() {
        let api = create();
        let shared = api.clone();
        assert!(api == shared);
        assert!(api != create());
    }
}
