mod comments;
mod posts;
