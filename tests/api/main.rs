mod helpers;
mod subscription;
