mod serialize;
mod util;
