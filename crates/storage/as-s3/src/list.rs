//! Paginated listing with continuation tokens.

use as_error::Result;
use as_traits::ObjectStore;
use as_types::{ListRequest, ObjectDescriptor};
use async_stream::try_stream;
use futures::Stream;
use tracing::{Instrument, Span, debug};

use crate::filter::KeyFilter;

/// List objects in a bucket that pass `filter`.
///
/// Returns a stream of [`ObjectDescriptor`] items, following continuation
/// tokens until the store stops returning one. Matches are yielded as each
/// page arrives.
///
/// - A page without contents ends the stream (empty bucket or no match).
/// - A single prefix is sent to the server; every key is still re-checked
///   locally against all prefixes and suffixes.
/// - A failed page request yields one `Err` and ends the stream.
///
/// The stream is not restartable. Calling this again starts a new scan.
///
/// # Example
///
/// ```ignore
/// use futures::{StreamExt, pin_mut};
///
/// let stream = list_objects(&store, "my-bucket", KeyFilter::new("data/", ".parquet"), Span::current());
/// pin_mut!(stream);
///
/// while let Some(result) = stream.next().await {
///     let obj = result?;
///     println!("Found: {} ({} bytes)", obj.key, obj.size);
/// }
/// ```
pub fn list_objects<'a, S>(
    store: &'a S,
    bucket: &'a str,
    filter: KeyFilter,
    span: Span,
) -> impl Stream<Item = Result<ObjectDescriptor>> + 'a
where
    S: ObjectStore + ?Sized,
{
    try_stream! {
        let mut request = ListRequest::new(bucket);
        request.prefix = filter.server_prefix().map(str::to_string);
        let mut page_number: u64 = 0;

        loop {
            let page = store.list_page(&request).instrument(span.clone()).await?;
            page_number += 1;

            let contents = match page.contents {
                Some(contents) => contents,
                None => {
                    debug!(parent: &span, bucket, page = page_number, "Page has no contents, listing done");
                    break;
                }
            };

            debug!(parent: &span, bucket, page = page_number, entries = contents.len(), "Listed page");

            for obj in contents {
                if filter.matches(&obj.key) {
                    yield obj;
                }
            }

            match page.next_continuation_token {
                Some(token) => request.continuation_token = Some(token),
                None => break,
            }
        }
    }
}
