pub mod rodio_device;

#[cfg(test)]
pub(crate) mod mock;
