use anyhow::Result;
use async_trait::async_trait;
use aws_smithy_http::byte_stream::ByteStream;

/// Raw bytes of an object along with the content type it was stored with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// The subset of object storage the Lambdas need.
///
/// Implemented for [`aws_sdk_s3::Client`]; handlers take it generically so they can be
/// driven by an in-memory store in tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()>;
}

#[async_trait]
impl ObjectStore for aws_sdk_s3::Client {
    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        get(self, bucket, key).await
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        put(self, bucket, key, body, content_type).await
    }
}

#[async_trait]
impl<T> ObjectStore for &T
where
    T: ObjectStore + ?Sized,
{
    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        (**self).get(bucket, key).await
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        (**self).put(bucket, key, body, content_type).await
    }
}

pub async fn get(s3: &aws_sdk_s3::Client, bucket_name: &str, object_key: &str) -> Result<StoredObject> {
    let object = s3
        .get_object()
        .bucket(bucket_name)
        .key(object_key)
        .send()
        .await?;

    let content_type = object.content_type().map(str::to_string);
    let body = object.body.collect().await?.into_bytes().to_vec();

    Ok(StoredObject { body, content_type })
}

pub async fn put(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    bytes: Vec<u8>,
    content_type: Option<&str>,
) -> Result<()> {
    let body = ByteStream::from(bytes);

    s3.put_object()
        .bucket(bucket)
        .key(key)
        .set_content_type(content_type.map(str::to_string))
        .body(body)
        .send()
        .await?;

    Ok(())
}
