//! `gloo-net` transport to the simulation backend.

use gloo_net::http::{Request, RequestBuilder, Response};
use viz_lib::control::{Form, Transport, CSRF_HEADER};
use viz_lib::error::{VizError, VizResult};
use wasm_bindgen::JsCast;
use web_sys::{File, FormData, HtmlDocument, RequestCache, UrlSearchParams};

/// Same-origin fetches relative to the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn with_csrf(builder: RequestBuilder, csrf: Option<&str>) -> RequestBuilder {
    match csrf {
        Some(token) => builder.header(CSRF_HEADER, token),
        None => builder,
    }
}

async fn body_of(path: &str, response: Result<Response, gloo_net::Error>) -> VizResult<String> {
    let response = response.map_err(|e| VizError::transport(path, e))?;
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(VizError::Status {
            path: path.to_string(),
            status,
            body,
        });
    }
    response.text().await.map_err(|e| VizError::transport(path, e))
}

fn encode_form(form: Form<'_>) -> VizResult<String> {
    let params = UrlSearchParams::new()
        .map_err(|e| VizError::transport("form", format!("{e:?}")))?;
    for (key, value) in form {
        params.append(key, value);
    }
    Ok(String::from(params.to_string()))
}

impl Transport for GlooTransport {
    async fn get(&self, path: &str) -> VizResult<String> {
        let response = Request::get(path).cache(RequestCache::NoStore).send().await;
        body_of(path, response).await
    }

    async fn post(&self, path: &str, form: Form<'_>, csrf: Option<&str>) -> VizResult<String> {
        let builder = with_csrf(Request::post(path), csrf);
        let request = if form.is_empty() {
            builder.build()
        } else {
            builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(encode_form(form)?)
        }
        .map_err(|e| VizError::transport(path, e))?;
        body_of(path, request.send().await).await
    }

    fn cookies(&self) -> Option<String> {
        let document = web_sys::window()?.document()?;
        document.dyn_into::<HtmlDocument>().ok()?.cookie().ok()
    }
}

impl GlooTransport {
    /// Multipart upload of a scenario file under the `file` field.
    pub async fn upload(&self, path: &str, file: &File, csrf: Option<&str>) -> VizResult<String> {
        let form = FormData::new().map_err(|e| VizError::transport(path, format!("{e:?}")))?;
        form.append_with_blob("file", file)
            .map_err(|e| VizError::transport(path, format!("{e:?}")))?;
        let request = with_csrf(Request::post(path), csrf)
            .body(form)
            .map_err(|e| VizError::transport(path, e))?;
        tracing::info!(path, name = %file.name(), "Uploading scenario");
        body_of(path, request.send().await).await
    }
}
