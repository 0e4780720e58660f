mod session;
mod stub;
