mod loading;
mod providers;
