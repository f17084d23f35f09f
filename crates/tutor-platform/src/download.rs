//! Save text to the user's downloads folder.

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use tutor_types::{Result, TutorError};

const TEXT_MIME: &str = "text/plain;charset=utf-8";

/// Offer `text` as a download named `filename` (Blob + object URL + anchor click).
pub fn download_text(filename: &str, text: &str) -> Result<()> {
    let bag = BlobPropertyBag::new();
    bag.set_type(TEXT_MIME);
    let parts = Array::of1(&JsValue::from_str(text));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &bag).map_err(js_error)?;
    let url = Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let document = gloo_utils::document();
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| TutorError::JsInterop("created element is not an anchor".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = gloo_utils::body();
    body.append_child(&anchor).map_err(js_error)?;
    anchor.click();
    body.remove_child(&anchor).map_err(js_error)?;
    Url::revoke_object_url(&url).map_err(js_error)?;

    log::info!("downloaded {} ({} bytes)", filename, text.len());
    Ok(())
}

fn js_error(e: JsValue) -> TutorError {
    TutorError::JsInterop(format!("{:?}", e))
}
